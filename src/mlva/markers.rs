use crate::mlva::{BinTable, LocusDef};
use itertools::Itertools;

/// Interprets a binary marker locus (MecA or PVL) as status text.
///
/// No candidate size is a valid negative call. A single distinct bin value
/// selects the positive text (value 2 is the MecC subtype of the MecA
/// marker). Anything else is a local lookup failure; it is reported in the
/// isolate's output but never aborts its typing.
pub fn classify(bins: &BinTable, locus: &LocusDef, sizes: &[u32]) -> String {
    if sizes.is_empty() {
        return negative_text(locus).to_string();
    }

    let values: Vec<Option<u32>> = sizes
        .iter()
        .map(|&size| bins.resolve(locus.name, size))
        .unique()
        .collect();

    match (locus.name, values.as_slice()) {
        ("MLVA_MecA", [Some(1)]) => "MecA Positive".to_string(),
        ("MLVA_MecA", [Some(2)]) => "MecC Positive".to_string(),
        ("MLVA_PVL", [Some(1)]) => "PVL Positive".to_string(),
        _ => format!("{} lookup failed", label(locus)),
    }
}

fn negative_text(locus: &LocusDef) -> &'static str {
    match locus.name {
        "MLVA_MecA" => "MecA MecC Negative",
        _ => "PVL Negative",
    }
}

fn label(locus: &LocusDef) -> &'static str {
    match locus.name {
        "MLVA_MecA" => "MecA",
        _ => "PVL",
    }
}
