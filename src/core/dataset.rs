//! Loading the item list the binary browses: a JSON file holding an array.

use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde_json::Value;

/// One list entry. Fields are looked up by name for searching and card text.
pub type Item = Value;

#[derive(Debug)]
pub enum DataError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The document parsed but its top level is not an array.
    NotAnArray(&'static str),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "data I/O error: {e}"),
            DataError::Json(e) => write!(f, "data parse error: {e}"),
            DataError::NotAnArray(found) => write!(f, "expected a JSON array, found {found}"),
        }
    }
}

impl std::error::Error for DataError {}

pub fn load_items(path: &Path) -> Result<Vec<Item>, DataError> {
    let contents = fs::read_to_string(path).map_err(DataError::Io)?;
    let items = parse_items(&contents)?;
    info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

pub fn parse_items(contents: &str) -> Result<Vec<Item>, DataError> {
    match serde_json::from_str(contents).map_err(DataError::Json)? {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Err(DataError::NotAnArray("an object")),
        Value::String(_) => Err(DataError::NotAnArray("a string")),
        Value::Number(_) => Err(DataError::NotAnArray("a number")),
        Value::Bool(_) => Err(DataError::NotAnArray("a boolean")),
        Value::Null => Err(DataError::NotAnArray("null")),
    }
}
