use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::Result,
    utils::persistence::{ensure_dir, write_text_atomic},
};

use super::DraftStore;

/// File-per-key storage under a single directory.
#[derive(Debug, Clone)]
pub struct JsonDraftStore {
    root: PathBuf,
}

impl JsonDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", canonical_key(key)))
    }
}

impl DraftStore for JsonDraftStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        write_text_atomic(&self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "entry".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_read_remove_cycle() {
        let dir = tempdir().unwrap();
        let store = JsonDraftStore::new(dir.path().join("local_storage")).unwrap();
        assert_eq!(store.read("invoice_form_data").unwrap(), None);

        store.write("invoice_form_data", "{\"a\":1}").unwrap();
        assert!(store.path_for("invoice_form_data").exists());
        assert_eq!(
            store.read("invoice_form_data").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.remove("invoice_form_data").unwrap();
        assert_eq!(store.read("invoice_form_data").unwrap(), None);
        store.remove("invoice_form_data").unwrap();
    }

    #[test]
    fn overwrite_replaces_previous_value() {
        let dir = tempdir().unwrap();
        let store = JsonDraftStore::new(dir.path()).unwrap();
        store.write("k", "first").unwrap();
        store.write("k", "second").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn keys_cannot_escape_the_root() {
        let dir = tempdir().unwrap();
        let store = JsonDraftStore::new(dir.path()).unwrap();
        let path = store.path_for("../outside");
        assert_eq!(path.parent(), Some(dir.path()));
    }
}
