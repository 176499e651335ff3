use crate::mlva::{
    loci::{LocusDef, LocusKind, MAX_AMPLICON_LEN},
    HitStore, TypingError,
};
use itertools::Itertools;
use std::collections::HashSet;

/// Reads the allele of the repeat-chain locus as a count of contiguous
/// repeat-unit copies anchored near its forward primer, instead of an
/// amplicon size. Returns `None` when no repeat-unit interval qualifies
/// (reported as the "99" sentinel by the caller).
///
/// The reverse primer is undetectable in roughly a third of isolates, so
/// contigs carrying only the forward primer are accepted; an isolate without
/// even a forward hit cannot be typed at this locus.
pub fn count_repeats(
    primer_store: &HitStore,
    repeat_store: &HitStore,
    locus: &LocusDef,
) -> Result<Option<u32>, TypingError> {
    let (repeat_subject, repeat_bitscore) = match locus.kind {
        LocusKind::RepeatChain {
            repeat_subject,
            repeat_bitscore,
        } => (repeat_subject, repeat_bitscore),
        _ => panic!("Repeat counting requested for non-repeat-chain locus {}", locus.name),
    };

    let primers = primer_store.with_min_bitscore(locus.bitscore);
    let forward_contigs = primers.contigs_hitting(locus.forward);
    if forward_contigs.is_empty() {
        return Err(TypingError::MissingPrimerData { locus: locus.name });
    }
    let shared_contigs = primers.restrict_to_subject(&forward_contigs, locus.reverse);
    let anchor_contigs = if shared_contigs.is_empty() {
        &forward_contigs
    } else {
        &shared_contigs
    };

    let mut anchor_ends = Vec::new();
    let mut anchor_starts = Vec::new();
    for contig in anchor_contigs {
        for hit in primers.hits_for(contig, locus.forward) {
            anchor_ends.push(hit.query_end as i64);
            anchor_starts.push(hit.query_start as i64);
        }
    }

    let repeats = repeat_store.with_min_bitscore(repeat_bitscore);
    let forward_set: HashSet<&str> = forward_contigs.iter().copied().collect();
    let intervals: Vec<(u32, u32)> = repeats
        .contigs_hitting(repeat_subject)
        .into_iter()
        .filter(|contig| forward_set.contains(*contig))
        .flat_map(|contig| {
            repeats
                .hits_for(contig, repeat_subject)
                .map(|h| (h.query_start, h.query_end))
                .collect::<Vec<_>>()
        })
        .collect();

    let in_range = intervals
        .into_iter()
        .filter(|&(start, _)| {
            let start = start as i64;
            anchor_ends
                .iter()
                .any(|&end| end - start > 0 && end - start <= MAX_AMPLICON_LEN)
                || anchor_starts
                    .iter()
                    .any(|&fs| fs - start <= 0 && fs - start >= -MAX_AMPLICON_LEN)
        })
        .unique()
        .collect_vec();

    Ok(chain_count(in_range))
}

/// Counts contiguous runs of repeat-unit intervals. The chain only grows on
/// exact adjacency (end + 1 == next start); overlapping copies and copies
/// separated by a gap do not extend it. This matches the established typing
/// behavior and is intentionally strict.
pub fn chain_count(mut intervals: Vec<(u32, u32)>) -> Option<u32> {
    if intervals.is_empty() {
        return None;
    }
    intervals.sort_by_key(|&(start, _)| start);
    let mut count = 1;
    for pair in intervals.windows(2) {
        let (cur_end, next_start) = (pair[0].1, pair[1].0);
        if cur_end < next_start && cur_end + 1 == next_start {
            count += 1;
        }
    }
    Some(count)
}
