use crate::mlva::TypingError;
use crate::utils::open_hits_reader;
use itertools::Itertools;
use std::{collections::HashSet, io::BufRead, path::Path};

/// One row of a 12-column comma-delimited BLAST hit report (`-outfmt 10`).
/// Coordinates are 1-based, as emitted by the alignment tool.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentHit {
    pub query_id: String,
    pub subject_id: String,
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatches: u32,
    pub gap_opens: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub subject_start: u32,
    pub subject_end: u32,
    pub e_value: f64,
    pub bitscore: f64,
}

impl AlignmentHit {
    pub fn from_row(line: &str) -> Result<Self, String> {
        const EXPECTED_FIELD_COUNT: usize = 12;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != EXPECTED_FIELD_COUNT {
            return Err(format!(
                "Expected {} comma-delimited fields, found {}: {}",
                EXPECTED_FIELD_COUNT,
                fields.len(),
                line
            ));
        }

        fn num<T: std::str::FromStr>(field: &str, name: &str) -> Result<T, String> {
            field
                .trim()
                .parse()
                .map_err(|_| format!("Could not parse {} from '{}'", name, field))
        }

        Ok(AlignmentHit {
            query_id: fields[0].to_string(),
            subject_id: fields[1].to_string(),
            percent_identity: num(fields[2], "percent identity")?,
            alignment_length: num(fields[3], "alignment length")?,
            mismatches: num(fields[4], "mismatch count")?,
            gap_opens: num(fields[5], "gap open count")?,
            query_start: num(fields[6], "query start")?,
            query_end: num(fields[7], "query end")?,
            subject_start: num(fields[8], "subject start")?,
            subject_end: num(fields[9], "subject end")?,
            e_value: num(fields[10], "e-value")?,
            bitscore: num(fields[11], "bitscore")?,
        })
    }
}

/// Alignment hits of one report for one isolate. A missing or empty report
/// is a valid zero-hit state, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitStore {
    hits: Vec<AlignmentHit>,
}

impl HitStore {
    pub fn load(path: &Path) -> Result<Self, TypingError> {
        if !path.exists() {
            return Ok(HitStore::default());
        }
        let reader = open_hits_reader(path).map_err(TypingError::Io)?;
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TypingError> {
        let mut hits = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| TypingError::Io(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let hit = AlignmentHit::from_row(&line).map_err(|reason| {
                TypingError::InvalidHitRecord {
                    line: line_number + 1,
                    reason,
                }
            })?;
            hits.push(hit);
        }
        Ok(HitStore { hits })
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Copy of this store keeping only hits at or above the given bitscore.
    /// Applied before any positional computation.
    pub fn with_min_bitscore(&self, min_bitscore: f64) -> HitStore {
        HitStore {
            hits: self
                .hits
                .iter()
                .filter(|h| h.bitscore >= min_bitscore)
                .cloned()
                .collect(),
        }
    }

    /// Unique contig ids with at least one hit to the given subject, in
    /// first-seen order.
    pub fn contigs_hitting(&self, subject_id: &str) -> Vec<&str> {
        self.hits
            .iter()
            .filter(|h| h.subject_id == subject_id)
            .map(|h| h.query_id.as_str())
            .unique()
            .collect()
    }

    /// Contig ids from `contigs` that also carry a hit to `subject_id`.
    pub fn restrict_to_subject<'a>(&self, contigs: &[&'a str], subject_id: &str) -> Vec<&'a str> {
        let with_subject: HashSet<&str> = self
            .hits
            .iter()
            .filter(|h| h.subject_id == subject_id)
            .map(|h| h.query_id.as_str())
            .collect();
        contigs
            .iter()
            .copied()
            .filter(|c| with_subject.contains(*c))
            .collect()
    }

    pub fn hits_for<'a>(
        &'a self,
        contig: &'a str,
        subject_id: &'a str,
    ) -> impl Iterator<Item = &'a AlignmentHit> {
        self.hits
            .iter()
            .filter(move |h| h.query_id == contig && h.subject_id == subject_id)
    }
}

/// Builds a synthetic hit report row for tests in this crate.
#[cfg(test)]
pub(crate) fn row(contig: &str, subject: &str, qstart: u32, qend: u32, bitscore: f64) -> String {
    format!(
        "{},{},95.0,20,1,0,{},{},1,20,1e-5,{}",
        contig, subject, qstart, qend, bitscore
    )
}
