//! Process memory and timing statistics for `--stats` output.

use std::fs;
use std::time::Duration;

/// Peak resident set size in KB, from `VmHWM` in `/proc/self/status`.
///
/// Returns `None` on platforms without procfs.
pub fn peak_rss_kb() -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Print the stats table to stderr.
pub fn display(total: Duration) {
    eprintln!();
    eprintln!("=== psichain stats ===");
    if let Some(kb) = peak_rss_kb() {
        eprintln!("  Peak RSS:   {kb:>8} KB");
    }
    eprintln!("  Total:      {:>8.3}s", total.as_secs_f64());
}
