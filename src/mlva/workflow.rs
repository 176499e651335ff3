use super::{
    bins::{BinCall, BinTable},
    hits::HitStore,
    loci::{LocusKind, MARKER_LOCI, SENTINEL, VNTR_LOCI},
    markers,
    profile::{self, LocusCall},
    repeats, sizes, TypingError,
};
use std::path::PathBuf;

/// Hit reports of one isolate; either file may be absent or empty.
#[derive(Debug, Clone)]
pub struct IsolateInput {
    pub id: String,
    pub primer_path: PathBuf,
    pub repeat_path: PathBuf,
}

/// Fully resolved typing outcome of one isolate.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolateReport {
    pub id: String,
    /// One or more complete profile strings; more than one only when a
    /// locus deviated.
    pub profiles: Vec<String>,
    /// Marker status lines in panel order (MecA, then PVL).
    pub marker_lines: Vec<String>,
}

pub fn analyze_isolate(input: &IsolateInput, bins: &BinTable) -> Result<IsolateReport, TypingError> {
    let primer_hits = HitStore::load(&input.primer_path)?;
    let repeat_hits = HitStore::load(&input.repeat_path)?;
    log::debug!(
        "{}: {} primer hits, {} repeat-unit hits",
        input.id,
        primer_hits.len(),
        repeat_hits.len()
    );
    resolve(&input.id, &primer_hits, &repeat_hits, bins)
}

/// Resolves the profile set and marker calls from materialized hit stores.
/// Pure apart from logging; safe to run concurrently across isolates with a
/// shared bin table.
pub fn resolve(
    id: &str,
    primer_hits: &HitStore,
    repeat_hits: &HitStore,
    bins: &BinTable,
) -> Result<IsolateReport, TypingError> {
    let mut calls = Vec::with_capacity(VNTR_LOCI.len());
    for locus in &VNTR_LOCI {
        let call = match locus.kind {
            LocusKind::RepeatChain { .. } => {
                let count = repeats::count_repeats(primer_hits, repeat_hits, locus)?;
                LocusCall::Code(match count {
                    Some(count) => count.to_string(),
                    None => SENTINEL.to_string(),
                })
            }
            _ => {
                let candidate_sizes = sizes::candidate_sizes(primer_hits, locus)?;
                match bins.resolve_all(locus.name, &candidate_sizes) {
                    BinCall::Absent => LocusCall::Code(SENTINEL.to_string()),
                    BinCall::Single(code) => LocusCall::Code(code),
                    BinCall::Deviated(codes) => {
                        log::info!(
                            "{}: {} resolves to {} distinct allele codes",
                            id,
                            locus.name,
                            codes.len()
                        );
                        LocusCall::Deviated(codes)
                    }
                }
            }
        };
        calls.push(call);
    }

    let profiles = profile::assemble(&calls);
    const VARIANT_WARN_LIMIT: usize = 8;
    if profiles.len() > VARIANT_WARN_LIMIT {
        log::warn!(
            "{}: deviated loci expanded into {} candidate profiles",
            id,
            profiles.len()
        );
    }

    let mut marker_lines = Vec::with_capacity(MARKER_LOCI.len());
    for locus in &MARKER_LOCI {
        let candidate_sizes = sizes::candidate_sizes(primer_hits, locus)?;
        marker_lines.push(markers::classify(bins, locus, &candidate_sizes));
    }

    Ok(IsolateReport {
        id: id.to_string(),
        profiles,
        marker_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlva::hits::row;
    use std::io::Cursor;

    fn bin_table() -> BinTable {
        let mut data = String::from("VNTR,Start,Stop,Value\n");
        for (i, locus) in VNTR_LOCI.iter().enumerate() {
            data.push_str(&format!("{},150,250,{}\n", locus.name, i + 1));
            data.push_str(&format!("{},251,350,{}\n", locus.name, i + 11));
        }
        data.push_str("MLVA_MecA,150,250,1\nMLVA_MecA,251,350,2\nMLVA_PVL,150,250,1\n");
        BinTable::from_reader(Cursor::new(data)).unwrap()
    }

    /// Primer rows giving every standard VNTR locus a single product of the
    /// requested size, plus a forward anchor for the repeat-chain locus.
    fn primer_rows(size: u32) -> Vec<String> {
        let mut rows = Vec::new();
        for locus in &VNTR_LOCI {
            match locus.kind {
                LocusKind::RepeatChain { .. } => {
                    rows.push(row("c1", locus.forward, 80, 100, 30.0));
                }
                _ => {
                    rows.push(row("c1", locus.forward, 500, 500 + size, 40.0));
                    rows.push(row("c1", locus.reverse, 500, 520, 40.0));
                }
            }
        }
        rows
    }

    fn primer_store(extra: &[String]) -> HitStore {
        let mut rows = primer_rows(200);
        rows.extend_from_slice(extra);
        HitStore::from_reader(Cursor::new(rows.join("\n"))).unwrap()
    }

    fn repeat_store(rows: &[String]) -> HitStore {
        HitStore::from_reader(Cursor::new(rows.join("\n"))).unwrap()
    }

    #[test]
    fn unambiguous_isolate_yields_one_profile() {
        let primers = primer_store(&[]);
        let repeats = repeat_store(&[
            row("c1", "VNTR63_01", 120, 170, 60.0),
            row("c1", "VNTR63_01", 171, 220, 60.0),
        ]);
        let report = resolve("iso1", &primers, &repeats, &bin_table()).unwrap();
        // Each in-bin locus contributes its padded bin value; the
        // repeat-chain locus contributes the chain count directly.
        assert_eq!(report.profiles, vec!["01-02-03-04-05-06-02-08"]);
        assert_eq!(
            report.marker_lines,
            vec!["MecA MecC Negative", "PVL Negative"]
        );
    }

    #[test]
    fn no_qualifying_repeat_intervals_yield_sentinel_in_profile() {
        let primers = primer_store(&[]);
        let report = resolve("iso1", &primers, &HitStore::default(), &bin_table()).unwrap();
        assert_eq!(report.profiles.len(), 1);
        let codes: Vec<&str> = report.profiles[0].split('-').collect();
        assert_eq!(codes[6], "99");
    }

    #[test]
    fn deviated_locus_yields_two_profiles_differing_at_one_position() {
        // A second VNTR09_01 product lands in the next bin (size 300).
        let primers = primer_store(&[
            row("c2", "VNTR09_01_Ff", 500, 800, 40.0),
            row("c2", "VNTR09_01_r", 500, 520, 40.0),
        ]);
        let repeats = repeat_store(&[row("c1", "VNTR63_01", 120, 170, 60.0)]);
        let report = resolve("iso1", &primers, &repeats, &bin_table()).unwrap();
        assert_eq!(report.profiles.len(), 2);
        let first: Vec<&str> = report.profiles[0].split('-').collect();
        let second: Vec<&str> = report.profiles[1].split('-').collect();
        assert_eq!(first[0], "01");
        assert_eq!(second[0], "11");
        assert_eq!(&first[1..], &second[1..]);
    }

    #[test]
    fn meca_product_in_bin_one_is_positive() {
        let primers = primer_store(&[
            row("c3", "MLVA_MecA_Ff", 480, 700, 40.0),
            row("c3", "MLVA_MecA_r", 500, 520, 40.0),
        ]);
        let report = resolve("iso1", &primers, &HitStore::default(), &bin_table()).unwrap();
        assert_eq!(report.marker_lines[0], "MecA Positive");
    }

    #[test]
    fn empty_primer_report_fails_isolate_with_missing_primer_data() {
        let err = resolve("iso1", &HitStore::default(), &HitStore::default(), &bin_table())
            .unwrap_err();
        assert!(matches!(err, TypingError::MissingPrimerData { .. }));
    }

    #[test]
    fn resolving_twice_yields_identical_reports() {
        let primers = primer_store(&[]);
        let repeats = repeat_store(&[row("c1", "VNTR63_01", 120, 170, 60.0)]);
        let bins = bin_table();
        let first = resolve("iso1", &primers, &repeats, &bins).unwrap();
        let second = resolve("iso1", &primers, &repeats, &bins).unwrap();
        assert_eq!(first, second);
    }
}
