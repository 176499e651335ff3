use itertools::Itertools;

/// Resolved contribution of one locus to the profile, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub enum LocusCall {
    /// A single allele code (including the "99" sentinel).
    Code(String),
    /// Distinct alternative codes of a deviated locus; every in-progress
    /// profile branches into one variant per code.
    Deviated(Vec<String>),
}

/// Folds the ordered locus calls into the final set of profile strings.
///
/// The accumulator is the set of profile prefixes built so far, starting
/// from one empty prefix. A single-code locus extends every prefix; a
/// deviated locus replaces the set by its Cartesian product with the
/// alternative codes, so deviation at several loci compounds
/// multiplicatively. Codes are left-zero-padded to two characters and
/// joined with `-`; the final set is deduplicated in first-seen order.
pub fn assemble(calls: &[LocusCall]) -> Vec<String> {
    let prefixes = calls.iter().fold(vec![String::new()], |acc, call| match call {
        LocusCall::Code(code) => acc.iter().map(|p| extend(p, code)).collect(),
        LocusCall::Deviated(codes) if codes.is_empty() => acc,
        LocusCall::Deviated(codes) => acc
            .iter()
            .cartesian_product(codes.iter())
            .map(|(p, code)| extend(p, code))
            .collect(),
    });

    let profiles: Vec<String> = prefixes.into_iter().unique().collect();
    log::debug!("Profile expansion produced {} variant(s)", profiles.len());
    profiles
}

fn extend(prefix: &str, code: &str) -> String {
    if prefix.is_empty() {
        pad(code)
    } else {
        format!("{}-{}", prefix, pad(code))
    }
}

/// Left-zero-pads single-character codes; codes are expected to be small
/// non-negative integers or the "99" sentinel.
fn pad(code: &str) -> String {
    if code.len() == 1 {
        format!("0{}", code)
    } else {
        code.to_string()
    }
}
