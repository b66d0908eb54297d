// src/core/export.rs

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `payload` as pretty-printed JSON into `<dir>/exports/`.
///
/// The file name is `<label>-<UTC timestamp>.json`. Returns the path written.
pub fn write_json<T: Serialize + ?Sized>(dir: &Path, label: &str, payload: &T) -> Result<PathBuf> {
    let export_dir = dir.join("exports");
    fs::create_dir_all(&export_dir)
        .wrap_err_with(|| format!("Failed to create {}", export_dir.display()))?;

    let file_name = format!("{}-{}.json", label, Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
    let path = export_dir.join(file_name);

    let json = serde_json::to_string_pretty(payload).wrap_err("Failed to serialize export")?;
    fs::write(&path, json).wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Export written.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModerationConfig;
    use crate::core::models::{ContentKind, Verdict};
    use crate::core::scanner::moderation_scanner::generate_verdict;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn writes_readable_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let verdict = generate_verdict(&mut rng, ContentKind::Image, &ModerationConfig::default());

        let path = write_json(dir.path(), "verdict", &verdict).unwrap();
        assert!(path.starts_with(dir.path().join("exports")));

        let back: Verdict = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.allowed, verdict.allowed);
        assert_eq!(back.category_flags, verdict.category_flags);
    }

    #[test]
    fn fails_when_directory_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(write_json(file.path(), "verdict", &1u8).is_err());
    }
}
