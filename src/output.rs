//! Per-worker timing output.

use crate::error::Result;
use crate::runner::WorkerReport;
use std::io::Write;

/// Write one line per worker: its index and elapsed wall-clock seconds.
///
/// Format:
/// ```text
/// worker 0: 0.412731 s (512 sites)
/// worker 1: 0.409882 s (512 sites)
/// ```
pub fn write_timings<W: Write>(reports: &[WorkerReport], writer: &mut W) -> Result<()> {
    for report in reports {
        writeln!(
            writer,
            "worker {}: {:.6} s ({} sites)",
            report.rank,
            report.elapsed.as_secs_f64(),
            report.sites
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn one_line_per_worker_with_index_and_seconds() {
        let reports = vec![
            WorkerReport {
                rank: 0,
                sites: 5,
                elapsed: Duration::from_millis(1500),
            },
            WorkerReport {
                rank: 1,
                sites: 5,
                elapsed: Duration::from_millis(250),
            },
        ];

        let mut buffer = Vec::new();
        write_timings(&reports, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "worker 0: 1.500000 s (5 sites)");
        assert_eq!(lines[1], "worker 1: 0.250000 s (5 sites)");
    }
}
