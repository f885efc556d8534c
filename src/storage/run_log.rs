//! Timestamped run-progress log
//!
//! Every pipeline run appends a monotonic sequence of stage-completion
//! messages to a plain text file. The path is part of the run configuration,
//! not a process-wide constant.

use eyre::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Appends `YYYY-Mon-DD-HH:MM:SS : message` lines to a log file.
pub struct RunLog {
    path: std::path::PathBuf,
}

impl RunLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one timestamped progress message, mirroring it to the logger.
    pub fn record(&self, message: &str) -> Result<()> {
        let timestamp = chrono::Local::now().format("%Y-%b-%d-%H:%M:%S");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open run log {}", self.path.display()))?;
        writeln!(file, "{} : {}", timestamp, message)
            .with_context(|| format!("Failed to write run log {}", self.path.display()))?;
        log::info!("{}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_timestamped_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("code_log.txt");
        let run_log = RunLog::new(&path);

        run_log.record("Preliminaries complete").unwrap();
        run_log.record("Process Complete.").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" : Preliminaries complete"));
        assert!(lines[1].ends_with(" : Process Complete."));

        // timestamp prefix must parse back under the fixed format
        let stamp = lines[0].split(" : ").next().unwrap();
        chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%b-%d-%H:%M:%S").unwrap();
    }
}
