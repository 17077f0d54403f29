//! Deserialize schema and input files with JSON-path context in errors.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;

/// Deserialize with the JSON path of the failure in the error message.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(anyhow!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Read and deserialize a file, naming the file in any failure.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    from_str_with_path(&src).with_context(|| format!("failed to parse {}", path.display()))
}
