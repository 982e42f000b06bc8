//! Items file loading
//!
//! A JSON array whose entries are either bare keys or objects:
//!
//! ```json
//! ["hola", {"key": "¿Dónde está el baño?", "highEffort": true}]
//! ```

use std::path::Path;

use anyhow::Context;
use mnemos_core::Item;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Key(String),
    Item(Item),
}

impl From<Entry> for Item {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Key(key) => Item::new(key),
            Entry::Item(item) => item,
        }
    }
}

/// Parse an items document. Blank keys are skipped.
pub fn parse_items(json: &str) -> anyhow::Result<Vec<Item>> {
    let entries: Vec<Entry> =
        serde_json::from_str(json).context("Items file must be a JSON array of keys or {key, highEffort} objects")?;
    Ok(entries
        .into_iter()
        .map(Item::from)
        .filter(|item| !item.key.trim().is_empty())
        .collect())
}

pub fn load_items(path: &Path) -> anyhow::Result<Vec<Item>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file {}", path.display()))?;
    parse_items(&json).with_context(|| format!("Invalid items file {}", path.display()))
}
