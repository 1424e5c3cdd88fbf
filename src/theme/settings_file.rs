//! Theme applier that edits a JSON settings file.
//!
//! The pair is stored as `["<ui>", "<syntax>"]` under a dotted key such as
//! `core.themes`. Every other key in the file is preserved. The new content
//! is written to a sibling temporary file and renamed over the original, so an
//! editor watching the file never reads a half-written document.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ThemeApplier, ThemePair};
use crate::core::Period;

pub struct SettingsFileApplier {
    path: PathBuf,
    key: Vec<String>,
}

impl SettingsFileApplier {
    pub fn new(path: PathBuf, key: &str) -> Result<Self> {
        let segments: Vec<String> = key.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            bail!("Invalid settings key '{key}': empty path segment");
        }
        Ok(Self {
            path,
            key: segments,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The pair currently stored in the settings file, if any.
    pub fn read_applied(&self) -> Result<Option<ThemePair>> {
        let root = self.read_root()?;
        let mut node = &root;
        for segment in &self.key {
            match node.get(segment) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }

        let pair = match node.as_array().map(Vec::as_slice) {
            Some([Value::String(ui), Value::String(syntax)]) => Some(ThemePair::new(ui, syntax)),
            _ => None,
        };
        Ok(pair)
    }

    fn read_root(&self) -> Result<Value> {
        if !self.path.exists() {
            return Ok(Value::Object(Map::new()));
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", self.path.display()))
    }

    fn write_root(&self, root: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut content = serde_json::to_string_pretty(root)?;
        content.push('\n');

        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Set `value` at the dotted path inside `root`, creating objects on the way.
fn set_at_path(root: &mut Value, path: &[String], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        bail!("Empty settings key");
    };

    let mut node = root;
    for segment in parents {
        let Value::Object(map) = node else {
            bail!("Settings entry above '{segment}' is not a JSON object");
        };
        node = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    match node {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        _ => bail!("Settings entry above '{last}' is not a JSON object"),
    }
}

impl ThemeApplier for SettingsFileApplier {
    fn apply(&mut self, _period: Period, pair: &ThemePair) -> Result<()> {
        let mut root = self.read_root()?;
        let themes = Value::Array(
            pair.as_list()
                .iter()
                .map(|name| Value::String((*name).to_string()))
                .collect(),
        );
        set_at_path(&mut root, &self.key, themes)
            .with_context(|| format!("Cannot store themes in {}", self.path.display()))?;
        self.write_root(&root)
    }

    fn applier_name(&self) -> &'static str {
        "settings file"
    }
}
