use crate::mlva::{
    loci::{LocusDef, LocusKind, MAX_AMPLICON_LEN},
    HitStore, TypingError,
};
use itertools::Itertools;

/// Derives the candidate amplicon sizes for a VNTR or marker locus.
///
/// The physical orientation of the forward primer relative to the reverse
/// primer on the assembled contig is not known in advance, so each hit pair
/// is sized under both orientations and only spans within the plausible
/// amplicon range are kept.
///
/// A VNTR locus with no contig carrying both primers fails the isolate; a
/// marker locus in the same situation yields an empty set, since absence of
/// marker hits is an expected negative call.
pub fn candidate_sizes(store: &HitStore, locus: &LocusDef) -> Result<Vec<u32>, TypingError> {
    let filtered = store.with_min_bitscore(locus.bitscore);
    let forward_contigs = filtered.contigs_hitting(locus.forward);
    let shared_contigs = filtered.restrict_to_subject(&forward_contigs, locus.reverse);

    if shared_contigs.is_empty() {
        return match locus.kind {
            LocusKind::Marker => Ok(Vec::new()),
            _ => Err(TypingError::MissingPrimerData { locus: locus.name }),
        };
    }

    let mut sizes = Vec::new();
    for contig in &shared_contigs {
        let forward_hits: Vec<_> = filtered.hits_for(contig, locus.forward).collect();
        let reverse_hits: Vec<_> = filtered.hits_for(contig, locus.reverse).collect();
        for f in &forward_hits {
            for r in &reverse_hits {
                // Forward upstream of reverse: product runs from the reverse
                // hit start to the forward hit end.
                let span = f.query_end as i64 - r.query_start as i64;
                if (0..=MAX_AMPLICON_LEN).contains(&span) {
                    sizes.push(span as u32);
                }
                // Opposite orientation: the raw difference is negative and
                // the product size is its magnitude.
                let span = f.query_start as i64 - r.query_end as i64;
                if (-MAX_AMPLICON_LEN..=0).contains(&span) {
                    sizes.push((-span) as u32);
                }
            }
        }
    }

    Ok(sizes.into_iter().sorted().dedup().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlva::hits::row;
    use crate::mlva::loci::{MARKER_LOCI, VNTR_LOCI};
    use std::io::Cursor;

    fn store(rows: &[String]) -> HitStore {
        HitStore::from_reader(Cursor::new(rows.join("\n"))).unwrap()
    }

    fn vntr09() -> &'static LocusDef {
        &VNTR_LOCI[0]
    }

    #[test]
    fn forward_upstream_of_reverse() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 480, 700, 40.0),
            row("c1", "VNTR09_01_r", 500, 520, 40.0),
        ]);
        assert_eq!(candidate_sizes(&store, vntr09()).unwrap(), vec![200]);
    }

    #[test]
    fn reverse_upstream_of_forward() {
        // forward start 500, reverse end 700: raw difference -200.
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 500, 520, 40.0),
            row("c1", "VNTR09_01_r", 680, 700, 40.0),
        ]);
        assert_eq!(candidate_sizes(&store, vntr09()).unwrap(), vec![200]);
    }

    #[test]
    fn spans_outside_plausible_range_are_dropped() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 1, 2000, 40.0),
            row("c1", "VNTR09_01_r", 100, 120, 40.0),
        ]);
        // 2000 - 100 = 1900 > 1200 and 1 - 120 = -119 yields 119.
        assert_eq!(candidate_sizes(&store, vntr09()).unwrap(), vec![119]);
    }

    #[test]
    fn sizes_are_deduplicated_across_contigs() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 480, 700, 40.0),
            row("c1", "VNTR09_01_r", 500, 520, 40.0),
            row("c2", "VNTR09_01_Ff", 1480, 1700, 40.0),
            row("c2", "VNTR09_01_r", 1500, 1520, 40.0),
        ]);
        assert_eq!(candidate_sizes(&store, vntr09()).unwrap(), vec![200]);
    }

    #[test]
    fn weak_hits_are_filtered_before_sizing() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 480, 700, 40.0),
            row("c1", "VNTR09_01_r", 500, 520, 10.0),
        ]);
        let err = candidate_sizes(&store, vntr09()).unwrap_err();
        assert_eq!(err, TypingError::MissingPrimerData { locus: "VNTR09_01" });
    }

    #[test]
    fn missing_reverse_primer_fails_vntr_locus() {
        let store = store(&[row("c1", "VNTR09_01_Ff", 480, 700, 40.0)]);
        let err = candidate_sizes(&store, vntr09()).unwrap_err();
        assert_eq!(err, TypingError::MissingPrimerData { locus: "VNTR09_01" });
    }

    #[test]
    fn primers_on_different_contigs_fail_vntr_locus() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 480, 700, 40.0),
            row("c2", "VNTR09_01_r", 500, 520, 40.0),
        ]);
        assert!(candidate_sizes(&store, vntr09()).is_err());
    }

    #[test]
    fn absent_marker_yields_empty_set() {
        let meca = &MARKER_LOCI[0];
        let store = HitStore::default();
        assert_eq!(candidate_sizes(&store, meca).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn candidate_sizes_is_idempotent() {
        let store = store(&[
            row("c1", "VNTR09_01_Ff", 480, 700, 40.0),
            row("c1", "VNTR09_01_r", 500, 520, 40.0),
        ]);
        let first = candidate_sizes(&store, vntr09()).unwrap();
        let second = candidate_sizes(&store, vntr09()).unwrap();
        assert_eq!(first, second);
    }
}
