use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Load the ordered municipality INSEE codes from a CSV export of the
/// urban-unit table. Row order is preserved.
pub fn load_insee_codes(path: &Path) -> Result<Vec<String>> {
    info!("Loading INSEE codes from {}", path.display());

    let file = File::open(path).context("Failed to open INSEE code file")?;
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = csv_reader.headers()?.clone();
    let code_idx = headers
        .iter()
        .position(|h| h == "CodeInsee")
        .context("Column 'CodeInsee' not found")?;

    let mut codes = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        codes.push(record[code_idx].to_string());
    }

    info!("Loaded {} INSEE codes", codes.len());
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_codes_keep_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Ville,CodeInsee\nBoulogne,92012\nMontreuil,93048\nArgenteuil,95018\n")
            .unwrap();

        let codes = load_insee_codes(&path).unwrap();
        assert_eq!(codes, vec!["92012", "93048", "95018"]);
    }

    #[test]
    fn test_missing_code_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        fs::write(&path, "Ville,Population\nBoulogne,120071\n").unwrap();

        assert!(load_insee_codes(&path).is_err());
    }
}
