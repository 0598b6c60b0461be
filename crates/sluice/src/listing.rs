//! Parsing of raw `LIST` output into directory entries.
//!
//! The engine only needs two facts per line: the entry name and whether it
//! is a directory. Both come from the Unix-style long listing format; lines
//! that do not fit it are skipped rather than failing the walk.

use tracing::debug;

/// Marker in the first column of the permissions field.
const DIRECTORY_MARKER: char = 'd';

/// How many whitespace-separated fields precede the entry name.
const NAME_FIELD_INDEX: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One parsed line of a directory listing, in server order.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    /// The unmodified listing line the entry was parsed from.
    pub raw: String,
}

impl DirectoryEntry {
    /// Parse one listing line.
    ///
    /// The line is split on runs of whitespace into at most nine fields;
    /// the name is everything from the ninth field onward, so names
    /// containing spaces survive. Lines with fewer than nine fields are
    /// unparseable and yield `None`. Anything whose permissions field does
    /// not start with `d` is treated as a file; misclassifications are
    /// corrected later, when the retrieve step is rejected.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_start();
        let mut permissions = "";
        for field in 0..NAME_FIELD_INDEX {
            let end = rest.find(char::is_whitespace)?;
            let (token, tail) = rest.split_at(end);
            if field == 0 {
                permissions = token;
            }
            rest = tail.trim_start();
        }
        if rest.is_empty() {
            return None;
        }

        let kind = if permissions.starts_with(DIRECTORY_MARKER) {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Some(Self {
            name: rest.to_owned(),
            kind,
            raw: line.to_owned(),
        })
    }
}

/// Parse a full listing, skipping unparseable lines, preserving server order.
pub fn parse_listing(lines: &[String]) -> Vec<DirectoryEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let entry = DirectoryEntry::parse(line);
            if entry.is_none() && !line.trim().is_empty() {
                debug!(line = %line, "Skipping unparseable listing line");
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_entry() {
        let entry =
            DirectoryEntry::parse("-rw-r--r--   1 ftp ftp      1024 Jan 01 12:00 reads.fastq.gz")
                .unwrap();
        assert_eq!(entry.name, "reads.fastq.gz");
        assert_eq!(entry.kind, EntryKind::File);
    }

    #[test]
    fn parses_directory_entry() {
        let entry =
            DirectoryEntry::parse("drwxr-xr-x   2 ftp ftp      4096 Jan 01 12:00 sub").unwrap();
        assert_eq!(entry.name, "sub");
        assert_eq!(entry.kind, EntryKind::Directory);
    }

    #[test]
    fn keeps_spaces_in_names() {
        let entry =
            DirectoryEntry::parse("-rw-r--r--   1 ftp ftp       512 Jan 01 12:00 two words.txt")
                .unwrap();
        assert_eq!(entry.name, "two words.txt");
    }

    #[test]
    fn symlinks_count_as_files() {
        let entry = DirectoryEntry::parse(
            "lrwxrwxrwx   1 ftp ftp         9 Jan 01 12:00 latest -> releases",
        )
        .unwrap();
        assert_eq!(entry.kind, EntryKind::File);
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(DirectoryEntry::parse("total 12").is_none());
        assert!(DirectoryEntry::parse("").is_none());
        assert!(DirectoryEntry::parse("drwxr-xr-x 2 ftp ftp 4096").is_none());
    }

    #[test]
    fn listing_preserves_server_order() {
        let lines = vec![
            "drwxr-xr-x   2 ftp ftp      4096 Jan 01 12:00 zulu".to_owned(),
            "total 12".to_owned(),
            "-rw-r--r--   1 ftp ftp        10 Jan 01 12:00 alpha.txt".to_owned(),
        ];
        let entries = parse_listing(&lines);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "zulu");
        assert_eq!(entries[1].name, "alpha.txt");
    }
}
