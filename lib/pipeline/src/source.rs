//! Source list loading
//!
//! One source per row: the first column is a URL or local path, further
//! columns are optional precomputed codes in signal order. Blank lines and
//! lines starting with `#` are skipped.

use std::path::Path;
use vidsim_core::{Code, Error, Result};

/// One row of the source list
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub source: String,
    /// Precomputed codes by signal position; `None` where the column is absent or blank
    pub codes: Vec<Option<Code>>,
}

impl SourceEntry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            codes: Vec::new(),
        }
    }

    /// Precomputed code for the signal at `position`, if any
    pub fn precomputed(&self, position: usize) -> Option<&Code> {
        self.codes.get(position).and_then(Option::as_ref)
    }

    pub fn is_remote(&self) -> bool {
        is_remote(&self.source)
    }
}

/// Whether a source has to be downloaded
pub fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn load_sources<P: AsRef<Path>>(path: P) -> Result<Vec<SourceEntry>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_sources(&text)
}

pub fn parse_sources(text: &str) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_row(trimmed).map_err(|reason| Error::SourceList {
            line: number + 1,
            reason,
        })?;

        let mut fields = fields.into_iter();
        let source = fields.next().unwrap_or_default();
        if source.is_empty() {
            return Err(Error::SourceList {
                line: number + 1,
                reason: "empty source column".into(),
            });
        }

        let codes = fields
            .map(|f| if f.is_empty() { None } else { Some(Code::new(f)) })
            .collect();

        entries.push(SourceEntry { source, codes });
    }

    Ok(entries)
}

/// Split one CSV row, honouring double quotes and `""` escapes
fn split_row(row: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".into());
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_first_column_is_source() {
        let entries = parse_sources("https://example.com/a.mp4\n./b.mp4\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, "https://example.com/a.mp4");
        assert!(entries[0].is_remote());
        assert_eq!(entries[1].source, "./b.mp4");
        assert!(!entries[1].is_remote());
        assert!(entries[1].codes.is_empty());
    }

    #[test]
    fn test_precomputed_codes() {
        let entries = parse_sources("a.mp4,1010,abcdef\nb.mp4,,xyz\n").unwrap();
        assert_eq!(entries[0].precomputed(0), Some(&Code::new("1010")));
        assert_eq!(entries[0].precomputed(1), Some(&Code::new("abcdef")));
        assert_eq!(entries[1].precomputed(0), None);
        assert_eq!(entries[1].precomputed(1), Some(&Code::new("xyz")));
        assert_eq!(entries[1].precomputed(2), None);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let entries = parse_sources("# videos\n\n  a.mp4  \n").unwrap();
        assert_eq!(entries, vec![SourceEntry::new("a.mp4")]);
    }

    #[test]
    fn test_quoted_fields() {
        let entries = parse_sources("\"clips/a, b.mp4\",\"10\"\"10\"\n").unwrap();
        assert_eq!(entries[0].source, "clips/a, b.mp4");
        assert_eq!(entries[0].precomputed(0), Some(&Code::new("10\"10")));
    }

    #[test]
    fn test_unterminated_quote_reports_line() {
        let err = parse_sources("a.mp4\n\"broken.mp4\n").unwrap_err();
        assert!(matches!(err, Error::SourceList { line: 2, .. }));
    }

    #[test]
    fn test_empty_source_rejected() {
        let err = parse_sources(",1010\n").unwrap_err();
        assert!(matches!(err, Error::SourceList { line: 1, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a.mp4").unwrap();
        writeln!(file, "b.mp4").unwrap();
        let entries = load_sources(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
