//! Application-level configuration loading, including the baby catalog.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    catalog::{Catalog, CatalogError},
    couple::Couple,
};

/// Default location on disk where the server looks for the catalog JSON.
const DEFAULT_CATALOG_PATH: &str = "config/catalog.json";
/// Environment variable that overrides [`DEFAULT_CATALOG_PATH`].
const CATALOG_PATH_ENV: &str = "BABY_MATCH_CATALOG_PATH";
/// Port used when neither `PORT` nor `SERVER_PORT` is set.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// MongoDB connection string; the in-memory store is used when absent.
    pub mongo_uri: Option<String>,
    /// MongoDB database name override.
    pub mongo_db: Option<String>,
    /// Baby sequence and guess options.
    pub catalog: Catalog,
}

impl AppConfig {
    /// Read the environment and the catalog file.
    pub fn load() -> Self {
        Self {
            port: env_port(),
            mongo_uri: non_empty_var("MONGO_URI"),
            mongo_db: non_empty_var("MONGO_DB"),
            catalog: load_catalog(),
        }
    }
}

/// Load the catalog from disk, falling back to the built-in nine babies.
pub fn load_catalog() -> Catalog {
    let path = resolve_catalog_path();
    match fs::read_to_string(&path) {
        Ok(contents) => match parse_catalog(&contents) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    babies = catalog.len(),
                    "loaded baby catalog from config"
                );
                catalog
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "invalid catalog; falling back to built-in babies"
                );
                Catalog::default()
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(
                path = %path.display(),
                "catalog file not found; using built-in babies"
            );
            Catalog::default()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to read catalog; falling back to built-in babies"
            );
            Catalog::default()
        }
    }
}

/// Reasons a catalog file is refused.
#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    /// Not valid JSON or not the expected shape.
    #[error("malformed catalog file: {0}")]
    Parse(#[from] serde_json::Error),
    /// Well-formed but semantically invalid.
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// Parse and validate a catalog document.
pub fn parse_catalog(contents: &str) -> Result<Catalog, CatalogFileError> {
    let raw: RawCatalog = serde_json::from_str(contents)?;
    Ok(raw.try_into()?)
}

#[derive(Debug, Deserialize)]
/// JSON representation of the file located at [`DEFAULT_CATALOG_PATH`].
struct RawCatalog {
    babies: Vec<RawBaby>,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    celebrities: Vec<String>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single baby inside the catalog file.
struct RawBaby {
    image_url: String,
    mom: String,
    dad: String,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = CatalogError;

    fn try_from(value: RawCatalog) -> Result<Self, Self::Error> {
        let answers = value
            .babies
            .into_iter()
            .map(|baby| (baby.image_url, Couple::new(baby.mom, baby.dad)))
            .collect();
        Catalog::new(answers, value.parents, value.celebrities)
    }
}

/// Resolve the catalog path taking the environment override into account.
fn resolve_catalog_path() -> PathBuf {
    env::var_os(CATALOG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

fn env_port() -> u16 {
    env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
