//! Country dataset loading
//!
//! Reads the canonical country list from a JSON file. Accepts a plain array
//! of names or the REST-countries export shape (`[{"name": {"common": ..}}]`).
//! Any failure falls back to the static list so the resolver always has
//! something to work with.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::country::CountryList;
use crate::error::AppError;

/// One dataset entry
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountryEntry {
    Plain(String),
    Record { name: CountryName },
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: String,
}

impl CountryEntry {
    fn into_name(self) -> String {
        match self {
            CountryEntry::Plain(name) => name,
            CountryEntry::Record { name } => name.common,
        }
    }
}

/// Parse a JSON dataset into a normalized country list
///
/// Returns `EmptyCountryList` if no usable names remain.
pub fn parse_countries(json: &str) -> Result<CountryList, AppError> {
    let entries: Vec<CountryEntry> = serde_json::from_str(json)?;
    let list = CountryList::new(entries.into_iter().map(CountryEntry::into_name));
    if list.is_empty() {
        return Err(AppError::EmptyCountryList);
    }
    Ok(list)
}

/// Read and parse a dataset file
pub async fn read_countries(path: &Path) -> Result<CountryList, AppError> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_countries(&json)
}

/// Load the country list, substituting the fallback on any failure
pub async fn load_countries(path: Option<&Path>) -> CountryList {
    let Some(path) = path else {
        info!("No country dataset configured, using fallback list");
        return CountryList::fallback();
    };

    match read_countries(path).await {
        Ok(list) => {
            info!("Loaded {} countries from {}", list.len(), path.display());
            list
        }
        Err(e) => {
            warn!(
                "Failed to load countries from {}: {}; using fallback list",
                path.display(),
                e
            );
            CountryList::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_names() {
        let list = parse_countries(r#"["Peru", "Chile", "Peru"]"#).unwrap();
        assert_eq!(list.as_slice(), ["Chile".to_string(), "Peru".to_string()]);
    }

    #[test]
    fn test_parse_rest_countries_shape() {
        let json = r#"[
            {"name": {"common": "Norway", "official": "Kingdom of Norway"}, "cca2": "NO"},
            {"name": {"common": "Denmark", "official": "Kingdom of Denmark"}, "cca2": "DK"}
        ]"#;
        let list = parse_countries(json).unwrap();
        assert_eq!(list.as_slice(), ["Denmark".to_string(), "Norway".to_string()]);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            parse_countries("[]"),
            Err(AppError::EmptyCountryList)
        ));
        assert!(matches!(
            parse_countries(r#"["  "]"#),
            Err(AppError::EmptyCountryList)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse_countries("{"), Err(AppError::Json(_))));
        assert!(matches!(
            parse_countries(r#"{"countries": []}"#),
            Err(AppError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_load_without_path_uses_fallback() {
        assert_eq!(load_countries(None).await, CountryList::fallback());
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_fallback() {
        let path = Path::new("/nonexistent/nasrichat/countries.json");
        assert!(matches!(read_countries(path).await, Err(AppError::Io(_))));
        assert_eq!(load_countries(Some(path)).await, CountryList::fallback());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir()
            .join(format!("nasrichat-countries-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, r#"["Spain", "Italy"]"#).await.unwrap();

        let list = load_countries(Some(path.as_path())).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(list.as_slice(), ["Italy".to_string(), "Spain".to_string()]);
    }
}
