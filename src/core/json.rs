//! JSON helpers reporting through [`Outcome`].
//!
//! These read and write directly and do not go through the provisioner.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::outcome::{FailureKind, Outcome};

pub fn to_json<T: Serialize>(value: &T) -> Outcome<String> {
    match serde_json::to_string(value) {
        Ok(json) => Outcome::success_with(json),
        Err(e) => Outcome::failure(FailureKind::Malformed, e.to_string()),
    }
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Outcome<String> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Outcome::success_with(json),
        Err(e) => Outcome::failure(FailureKind::Malformed, e.to_string()),
    }
}

/// Only fields present in both the JSON and `T` are populated; unknown
/// JSON fields are ignored unless `T` says otherwise.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Outcome<T> {
    match serde_json::from_str(json) {
        Ok(value) => Outcome::success_with(value),
        Err(e) => Outcome::failure(FailureKind::Malformed, e.to_string()),
    }
}

/// Read a UTF-8 JSON document from `path`
pub fn from_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Outcome<T> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            return Outcome::failure(
                FailureKind::ReadFailed,
                format!("cannot open {}: {}", path.display(), e),
            );
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Outcome::success_with(value),
        Err(e) if e.is_io() => Outcome::failure(FailureKind::ReadFailed, e.to_string()),
        Err(e) => Outcome::failure(FailureKind::Malformed, e.to_string()),
    }
}
