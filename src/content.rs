//! # Content Store
//!
//! The two static catalogs the oracle draws from:
//!
//! - `aforismi.json`: aphorisms (theme, emotion, author, text)
//! - `archetipi.json`: archetypes (name, description, theme, energy)
//!
//! Both are plain JSON arrays using the Italian field names of the data files.
//! They are read fresh for every consultation and never mutated, so edits to the
//! data directory take effect on the next request.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APHORISMS_FILE: &str = "aforismi.json";
pub const ARCHETYPES_FILE: &str = "archetipi.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aphorism {
    #[serde(rename = "tema")]
    pub theme: String,
    #[serde(rename = "emozione")]
    pub emotion: String,
    #[serde(rename = "autore")]
    pub author: String,
    #[serde(rename = "testo")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    /// Cross-reference key used to resolve the model's free-text choice.
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descrizione")]
    pub description: String,
    #[serde(rename = "tema")]
    pub theme: String,
    #[serde(rename = "energia")]
    pub energy: String,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content file {} is not a valid JSON array", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{collection} collection in {} is empty", .path.display())]
    Empty {
        collection: &'static str,
        path: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    pub aphorisms: Vec<Aphorism>,
    pub archetypes: Vec<Archetype>,
}

impl ContentStore {
    /// Read both catalogs from `dir`. Fails on unreadable files, malformed JSON,
    /// or an empty collection.
    pub async fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let aphorisms = read_collection(dir.join(APHORISMS_FILE), "aphorism").await?;
        let archetypes = read_collection(dir.join(ARCHETYPES_FILE), "archetype").await?;
        Ok(Self {
            aphorisms,
            archetypes,
        })
    }

    /// Catalog names in order, as offered to the model.
    pub fn archetype_names(&self) -> Vec<String> {
        self.archetypes.iter().map(|a| a.name.clone()).collect()
    }
}

async fn read_collection<T: DeserializeOwned>(
    path: PathBuf,
    collection: &'static str,
) -> Result<Vec<T>, ContentError> {
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(s) => s,
        Err(source) => return Err(ContentError::Read { path, source }),
    };
    parse_collection(&raw, path, collection)
}

fn parse_collection<T: DeserializeOwned>(
    raw: &str,
    path: PathBuf,
    collection: &'static str,
) -> Result<Vec<T>, ContentError> {
    let items: Vec<T> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(source) => return Err(ContentError::Parse { path, source }),
    };
    if items.is_empty() {
        return Err(ContentError::Empty { collection, path });
    }
    Ok(items)
}
