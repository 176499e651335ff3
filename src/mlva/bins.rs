use crate::mlva::SENTINEL;
use crate::utils::open_hits_reader;
use itertools::Itertools;
use std::{io::BufRead, path::Path};

#[derive(Debug, Clone, PartialEq)]
pub struct BinRow {
    pub locus: String,
    pub start: u32,
    pub stop: u32,
    pub value: u32,
}

/// Per-locus table mapping inclusive amplicon size ranges to allele codes,
/// loaded once per run. Rows of one locus are expected to tile its plausible
/// size range but are not required to be contiguous or non-overlapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinTable {
    rows: Vec<BinRow>,
}

/// Resolution outcome for one locus's candidate size set.
#[derive(Debug, Clone, PartialEq)]
pub enum BinCall {
    /// No candidate sizes; reported as the "99" sentinel.
    Absent,
    /// All candidate sizes resolve to one allele code.
    Single(String),
    /// Candidate sizes resolve to two or more distinct codes; the profile
    /// branches into one variant per code.
    Deviated(Vec<String>),
}

impl BinTable {
    pub fn load(path: &Path) -> crate::utils::Result<Self> {
        let reader = open_hits_reader(path)?;
        Self::from_reader(reader)
            .map_err(|e| format!("Bin mapping table {}: {}", path.display(), e))
    }

    /// Parses `locus,start,stop,value` rows; a leading header line is
    /// skipped when its numeric columns do not parse.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, String> {
        let mut rows = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| e.to_string())?;
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_row(&line) {
                Ok(row) => rows.push(row),
                Err(_) if line_number == 0 => continue,
                Err(e) => return Err(format!("line {}: {}", line_number + 1, e)),
            }
        }
        Ok(BinTable { rows })
    }

    fn parse_row(line: &str) -> Result<BinRow, String> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(format!("expected 4 fields, found {}", fields.len()));
        }
        let num = |field: &str| {
            field
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("could not parse '{}' as a number", field))
        };
        Ok(BinRow {
            locus: fields[0].trim().to_string(),
            start: num(fields[1])?,
            stop: num(fields[2])?,
            value: num(fields[3])?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Maps a candidate size to an allele code for one locus.
    ///
    /// Exactly one row with `start <= size <= stop` wins. Several matching
    /// rows are a lookup failure (`None`), since the table cannot tell the
    /// alleles apart. When no row matches, the nearest row by
    /// `|start - size| + |stop - size|` is used; ties are broken by taking
    /// the first minimal row in table order, which is the documented
    /// deterministic rule for this table.
    pub fn resolve(&self, locus: &str, size: u32) -> Option<u32> {
        let rows = self.rows.iter().filter(|r| r.locus == locus);
        let matches: Vec<&BinRow> = rows
            .clone()
            .filter(|r| r.start <= size && size <= r.stop)
            .collect();
        match matches.len() {
            1 => Some(matches[0].value),
            0 => rows
                .min_by_key(|r| {
                    r.start.abs_diff(size) as u64 + r.stop.abs_diff(size) as u64
                })
                .map(|r| r.value),
            _ => None,
        }
    }

    /// Resolves every candidate size of a locus independently and collapses
    /// the outcome. An individual failed lookup contributes the sentinel.
    pub fn resolve_all(&self, locus: &str, sizes: &[u32]) -> BinCall {
        if sizes.is_empty() {
            return BinCall::Absent;
        }
        let codes: Vec<String> = sizes
            .iter()
            .map(|&size| {
                self.resolve(locus, size)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| SENTINEL.to_string())
            })
            .unique()
            .collect();
        if codes.len() == 1 {
            BinCall::Single(codes.into_iter().next().unwrap())
        } else {
            BinCall::Deviated(codes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table(data: &str) -> BinTable {
        BinTable::from_reader(Cursor::new(data)).unwrap()
    }

    const TABLE: &str = "\
VNTR,Start,Stop,Value
VNTR09_01,150,250,1
VNTR09_01,251,350,2
VNTR09_01,400,500,3
MLVA_MecA,150,250,1
MLVA_MecA,251,350,2
";

    #[test]
    fn header_line_is_skipped() {
        let t = table(TABLE);
        assert!(!t.is_empty());
        assert_eq!(t.resolve("MLVA_MecA", 200), Some(1));
    }

    #[test]
    fn malformed_row_past_header_is_an_error() {
        let data = "VNTR,Start,Stop,Value\nVNTR09_01,150,xyz,1\n";
        let err = BinTable::from_reader(Cursor::new(data)).unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn size_inside_range_resolves_exactly() {
        let t = table(TABLE);
        assert_eq!(t.resolve("VNTR09_01", 150), Some(1));
        assert_eq!(t.resolve("VNTR09_01", 250), Some(1));
        assert_eq!(t.resolve("VNTR09_01", 300), Some(2));
    }

    #[test]
    fn size_outside_all_ranges_takes_nearest() {
        let t = table(TABLE);
        // 375 sits in the gap between [251,350] and [400,500].
        assert_eq!(t.resolve("VNTR09_01", 375), Some(2));
        assert_eq!(t.resolve("VNTR09_01", 390), Some(3));
        assert_eq!(t.resolve("VNTR09_01", 10), Some(1));
    }

    #[test]
    fn nearest_range_tie_takes_first_row_in_table_order() {
        let t = table(
            "VNTR,Start,Stop,Value\nVNTR09_01,100,200,1\nVNTR09_01,300,400,2\n",
        );
        // 250 is equidistant from both rows.
        assert_eq!(t.resolve("VNTR09_01", 250), Some(1));
    }

    #[test]
    fn overlapping_exact_matches_fail_lookup() {
        let t = table(
            "VNTR,Start,Stop,Value\nVNTR09_01,100,300,1\nVNTR09_01,200,400,2\n",
        );
        assert_eq!(t.resolve("VNTR09_01", 250), None);
    }

    #[test]
    fn unknown_locus_fails_lookup() {
        assert_eq!(table(TABLE).resolve("VNTR99_99", 200), None);
    }

    #[test]
    fn resolve_all_of_no_sizes_is_absent() {
        assert_eq!(table(TABLE).resolve_all("VNTR09_01", &[]), BinCall::Absent);
    }

    #[test]
    fn sizes_in_one_bin_collapse_to_single_call() {
        let call = table(TABLE).resolve_all("VNTR09_01", &[180, 220]);
        assert_eq!(call, BinCall::Single("1".to_string()));
    }

    #[test]
    fn sizes_in_different_bins_deviate() {
        let call = table(TABLE).resolve_all("VNTR09_01", &[180, 300]);
        assert_eq!(
            call,
            BinCall::Deviated(vec!["1".to_string(), "2".to_string()])
        );
    }

    #[test]
    fn failed_lookup_contributes_sentinel() {
        let call = table(TABLE).resolve_all("VNTR99_99", &[180]);
        assert_eq!(call, BinCall::Single("99".to_string()));
    }
}
