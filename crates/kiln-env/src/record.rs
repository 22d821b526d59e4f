//! RECORD parsing for built package archives.
//!
//! One line per entry: `path,sha256-hex,size`. The RECORD line itself has an
//! empty hash and size. Malformed lines are skipped rather than fatal; the
//! hash verification in the installer is what guards integrity.

/// Name of the integrity manifest inside a package archive.
pub const RECORD_NAME: &str = "RECORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub path: String,
    /// None for the RECORD line itself.
    pub sha256: Option<String>,
    pub size: Option<u64>,
}

/// Parse RECORD text into entries.
#[must_use]
pub fn parse_record(text: &str) -> Vec<RecordEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut parts = line.splitn(3, ',');
            let path = parts.next()?.to_string();
            let sha256 = parts.next().map(str::to_string).filter(|s| !s.is_empty());
            let size = parts.next().and_then(|s| s.parse().ok());
            Some(RecordEntry { path, sha256, size })
        })
        .collect()
}
