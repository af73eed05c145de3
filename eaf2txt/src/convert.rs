//! Conversion entry points: EAF path in, output rows or `.txt` file out

use crate::eaf::{parse_eaf, project, resolve, ParsedEaf, RowOrder};
use crate::tsv::write_rows;
use eaf2txt_common::{Error, OutputRow, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read and parse an EAF file
pub fn parse_eaf_file(eaf_path: &Path) -> Result<ParsedEaf> {
    let bytes = std::fs::read(eaf_path)?;
    let xml = String::from_utf8(bytes).map_err(|e| {
        Error::malformed(
            eaf_path.display().to_string(),
            format!("not valid UTF-8: {}", e),
        )
    })?;
    parse_eaf(&xml)
}

/// Parse, resolve and project one EAF file
pub fn convert_eaf_to_rows(eaf_path: &Path, order: RowOrder) -> Result<Vec<OutputRow>> {
    let parsed = parse_eaf_file(eaf_path)?;
    let resolved = resolve(&parsed.time_slots, parsed.annotations)?;
    let rows = project(resolved, order);
    debug!("{}: {} rows", eaf_path.display(), rows.len());
    Ok(rows)
}

/// Convert one EAF file to a tab-delimited `.txt` file next to it.
///
/// Returns the path of the written file.
pub fn convert_eaf_to_txt(eaf_path: &Path, order: RowOrder) -> Result<PathBuf> {
    let rows = convert_eaf_to_rows(eaf_path, order)?;
    write_txt(eaf_path, &rows)
}

/// Write already converted rows to the `.txt` file for `eaf_path`
pub fn write_txt(eaf_path: &Path, rows: &[OutputRow]) -> Result<PathBuf> {
    let output_path = txt_path_for(eaf_path);
    let file = File::create(&output_path)?;
    write_rows(BufWriter::new(file), rows)?;
    info!("Wrote {} rows to {}", rows.len(), output_path.display());
    Ok(output_path)
}

/// Same base name with the extension replaced by `.txt`
pub fn txt_path_for(eaf_path: &Path) -> PathBuf {
    eaf_path.with_extension("txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_path_for() {
        assert_eq!(txt_path_for(Path::new("/data/5959-0GS0.eaf")), PathBuf::from("/data/5959-0GS0.txt"));
        assert_eq!(txt_path_for(Path::new("rec.v2.eaf")), PathBuf::from("rec.v2.txt"));
        assert_eq!(txt_path_for(Path::new("noext")), PathBuf::from("noext.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.eaf");
        std::fs::write(&path, [0x3c, 0xff, 0xfe, 0x3e]).unwrap();

        assert!(matches!(parse_eaf_file(&path), Err(Error::MalformedInput { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.eaf");

        assert!(matches!(convert_eaf_to_rows(&path, RowOrder::default()), Err(Error::Io(_))));
    }
}
