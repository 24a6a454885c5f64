//! Utility functions for file parsing.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// True when the path names a gzip-compressed file.
pub fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".gz")
}

/// Open `path` as a buffered reader, decompressing `.gz` files on the fly.
///
/// `what` names the file in the error message (e.g. "GTF").
pub fn open_buffered(path: &Path, what: &str) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", what, path.display()))?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Field delimiter for a position table: `,` for `.csv` (optionally gzipped),
/// tab otherwise.
pub fn table_delimiter(path: &Path) -> u8 {
    let name = path.to_string_lossy().to_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".csv") {
        b','
    } else {
        b'\t'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_table_delimiter() {
        assert_eq!(table_delimiter(&PathBuf::from("rows.csv")), b',');
        assert_eq!(table_delimiter(&PathBuf::from("ROWS.CSV.gz")), b',');
        assert_eq!(table_delimiter(&PathBuf::from("rows.tsv")), b'\t');
        assert_eq!(table_delimiter(&PathBuf::from("rows.txt")), b'\t');
    }

    #[test]
    fn test_open_buffered_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(b"first\nsecond\n").unwrap();
        encoder.finish().unwrap();

        let reader = open_buffered(&path, "test").unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_open_buffered_missing_file() {
        let err = open_buffered(Path::new("/nonexistent/file.gtf"), "GTF")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to open GTF file"));
    }
}
