use crate::error::Result;
use crate::models::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// Theme preference backed by a small JSON file. Read once on load, written
/// on every change.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    current: Preferences,
}

impl PreferenceStore {
    /// A missing or unreadable file yields the default light theme.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };
        log::debug!("Theme preference: {:?}", current.theme);

        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.current.theme = theme;
        self.persist()
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.current.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(&self.current)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::load(dir.path().join("prefs.json"));
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_corrupt_file_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(PreferenceStore::load(&path).theme(), Theme::Light);
    }

    #[test]
    fn test_changes_are_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = PreferenceStore::load(&path);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"theme":"dark"}"#);
        assert_eq!(PreferenceStore::load(&path).theme(), Theme::Dark);

        store.set_theme(Theme::Light).unwrap();
        assert_eq!(PreferenceStore::load(&path).theme(), Theme::Light);
    }
}
