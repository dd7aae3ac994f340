//! Atomic JSON file helpers shared by the storage, config, and outbox layers.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

const TMP_SUFFIX: &str = "tmp";

/// Creates `path` (and parents) when it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Serializes `value` to pretty JSON and writes it atomically by staging to a
/// sibling temporary file before renaming over the target.
pub fn save_json_atomic<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text_atomic(path, &json)
}

/// Writes raw text atomically (temp file + rename).
pub fn write_text_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a JSON document from disk, returning structured errors on failure.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        amount: f64,
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("nested").join("sample.json");
        let sample = Sample {
            name: "Acme".into(),
            amount: 12.5,
        };
        save_json_atomic(&sample, &path).expect("save");
        let loaded: Sample = load_json(&path).expect("load");
        assert_eq!(loaded, sample);
        assert!(!tmp_path(&path).exists(), "temp file must be renamed away");
    }

    #[test]
    fn failed_write_preserves_original_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("draft.json");
        write_text_atomic(&path, "original").expect("initial write");

        // A directory squatting on the temp name makes File::create fail.
        fs::create_dir_all(tmp_path(&path)).unwrap();
        assert!(write_text_atomic(&path, "replacement").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn tmp_path_appends_suffix_to_existing_extension() {
        assert_eq!(
            tmp_path(Path::new("/x/invoice_form_data.json")),
            PathBuf::from("/x/invoice_form_data.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/x/plain")), PathBuf::from("/x/plain.tmp"));
    }
}
