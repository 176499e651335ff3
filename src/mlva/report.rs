use super::workflow::IsolateReport;
use crate::utils::Result;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes the per-isolate text report: one `MLVA profile:` line per resolved
/// profile, followed by the MecA and PVL status lines.
pub fn write_report(outdir: &Path, report: &IsolateReport) -> Result<PathBuf> {
    let path = outdir.join(format!("{}_MLVA.txt", report.id));
    let file = File::create(&path)
        .map_err(|e| format!("Failed to create report {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);

    let write_err = |e: std::io::Error| format!("Failed to write {}: {}", path.display(), e);
    for profile in &report.profiles {
        writeln!(writer, "MLVA profile: {}", profile).map_err(write_err)?;
    }
    for line in &report.marker_lines {
        writeln!(writer, "{}", line).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    Ok(path)
}
