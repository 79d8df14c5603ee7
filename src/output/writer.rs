//! Writers for the crawl result and the profile report
//!
//! Both write to stdout when given an empty path, and otherwise append to the
//! file at that path, creating it if needed.

use crate::output::CrawlResult;
use crate::CrawlError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Writes the crawl result as pretty-printed JSON
pub fn write_result(result: &CrawlResult, path: &str) -> Result<(), CrawlError> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    write_text(&json, path)
}

/// Writes the profiler report text
pub fn write_profile(report: &str, path: &str) -> Result<(), CrawlError> {
    write_text(report, path)
}

fn write_text(text: &str, path: &str) -> Result<(), CrawlError> {
    let path = path.trim();

    if path.is_empty() {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        handle.flush()?;
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(path))?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    tracing::info!("Wrote {} bytes to {}", text.len(), path);
    Ok(())
}
