//! Shared test data listed in `fixtures/manifest.json` at the workspace root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const MANIFEST_JSON: &str = include_str!("../../../../fixtures/manifest.json");

static MANIFEST: Lazy<std::result::Result<Manifest, String>> =
    Lazy::new(|| serde_json::from_str(MANIFEST_JSON).map_err(|err| err.to_string()));

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: BTreeMap<String, String>,
    stores: BTreeMap<String, StoreFiles>,
}

/// A store snapshot, optionally paired with the reads expected after load.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoreFiles {
    Snapshot(String),
    WithExpect { path: String, expect: String },
}

impl StoreFiles {
    fn snapshot(&self) -> &str {
        match self {
            StoreFiles::Snapshot(path) | StoreFiles::WithExpect { path, .. } => path,
        }
    }
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST
        .as_ref()
        .map_err(|err| anyhow!("fixtures manifest is malformed: {err}"))
}

fn read(rel: &str) -> Result<String> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "../../../fixtures", rel]
        .iter()
        .collect();
    std::fs::read_to_string(&path).with_context(|| format!("reading fixture {}", path.display()))
}

fn parse<T: DeserializeOwned>(rel: &str) -> Result<T> {
    serde_json::from_str(&read(rel)?).with_context(|| format!("parsing fixture {rel}"))
}

fn entry<'a, T>(section: &'a BTreeMap<String, T>, name: &str) -> Result<&'a T> {
    section
        .get(name)
        .ok_or_else(|| anyhow!("no fixture named {name:?}"))
}

/// Keyframe sampling cases: keyframe text plus expected samples.
pub mod animations {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        manifest()
            .map(|m| m.animations.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(entry(&manifest()?.animations, name)?)
    }
}

/// Property store snapshots in their JSON map form.
pub mod stores {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        manifest()
            .map(|m| m.stores.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Raw snapshot text, for feeding a store's own JSON reader.
    pub fn json(name: &str) -> Result<String> {
        read(entry(&manifest()?.stores, name)?.snapshot())
    }

    /// Reads expected after loading, when the manifest lists them.
    pub fn expect<T: DeserializeOwned>(name: &str) -> Result<Option<T>> {
        match entry(&manifest()?.stores, name)? {
            StoreFiles::WithExpect { expect, .. } => parse(expect).map(Some),
            StoreFiles::Snapshot(_) => Ok(None),
        }
    }
}
