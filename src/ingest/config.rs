use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub areas: Vec<AreaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    pub overpass_url: String,
    pub output: PathBuf,
    pub cache_dir: PathBuf,
}

/// One area entry: exactly one of `iso` or `insee_csv` must be set.
#[derive(Debug, Deserialize, Clone)]
pub struct AreaConfig {
    pub name: String,
    pub iso: Option<String>,
    pub insee_csv: Option<PathBuf>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        for area in &config.areas {
            if area.iso.is_some() == area.insee_csv.is_some() {
                bail!(
                    "area '{}' must set exactly one of 'iso' or 'insee_csv'",
                    area.name
                );
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("katapult.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_two_area_config() {
        let (_dir, path) = write_config(
            r#"
            [global]
            overpass_url = "https://lz4.overpass-api.de/api/interpreter"
            output = "katapult.gpkg"
            cache_dir = "."

            [[areas]]
            name = "Paris"
            iso = "FR-75"

            [[areas]]
            name = "UniteUrbaine"
            insee_csv = "unite_urbaine_de_paris.csv"
            "#,
        );
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.areas.len(), 2);
        assert_eq!(config.areas[0].iso.as_deref(), Some("FR-75"));
        assert!(config.areas[1].insee_csv.is_some());
    }

    #[test]
    fn test_area_with_both_selectors_rejected() {
        let (_dir, path) = write_config(
            r#"
            [global]
            overpass_url = "https://lz4.overpass-api.de/api/interpreter"
            output = "katapult.gpkg"
            cache_dir = "."

            [[areas]]
            name = "Paris"
            iso = "FR-75"
            insee_csv = "also.csv"
            "#,
        );
        assert!(Config::load_from_file(&path).is_err());
    }
}
