use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("Catalog has no `List` array")]
    MissingList,
    #[error("Catalog entry {0} has no usable `CityCode`")]
    InvalidEntry(usize),
}

/// One catalog row. Only `city_code` is served over HTTP; `city_name` is kept
/// for callers of `load` that want the full entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CityEntry {
    pub city_code: String,
    pub city_name: Option<String>,
}

/// Reads the bundled city list. The file is re-read on every call.
pub struct CityCatalog {
    path: PathBuf,
}

impl CityCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the catalog file is present right now. Relative paths resolve
    /// against the working directory, so this is checked at startup.
    pub fn is_present(&self) -> bool {
        self.path.is_file()
    }

    pub async fn load(&self) -> Result<Vec<CityEntry>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;

        parse_catalog(&raw)
    }

    pub async fn list_city_codes(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .map(|entry| entry.city_code)
            .collect())
    }
}

fn parse_catalog(raw: &str) -> Result<Vec<CityEntry>, CatalogError> {
    let document: Value = serde_json::from_str(raw)?;
    let list = document
        .get("List")
        .and_then(Value::as_array)
        .ok_or(CatalogError::MissingList)?;

    list.iter()
        .enumerate()
        .map(|(index, item)| {
            let city_code = match item.get("CityCode") {
                Some(Value::String(code)) if !code.is_empty() => code.clone(),
                Some(Value::Number(code)) => code.to_string(),
                _ => return Err(CatalogError::InvalidEntry(index)),
            };
            let city_name = item
                .get("CityName")
                .and_then(Value::as_str)
                .map(str::to_string);

            Ok(CityEntry {
                city_code,
                city_name,
            })
        })
        .collect()
}
