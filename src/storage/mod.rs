// src/storage/mod.rs
use crate::app::Theme;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

const THEME_FILE: &str = "theme";

/// Persists the one piece of durable UI state: the theme preference.
pub struct ThemeStore {
    base_dir: PathBuf,
}

impl ThemeStore {
    /// Creates a new ThemeStore rooted at the specified directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::Io)?;
        }

        Ok(Self {
            base_dir: base_path,
        })
    }

    fn theme_path(&self) -> PathBuf {
        self.base_dir.join(THEME_FILE)
    }

    /// Reads the persisted theme. A missing or unreadable file falls
    /// back to the default light theme rather than failing startup.
    pub fn load(&self) -> Theme {
        match fs::read_to_string(self.theme_path()) {
            Ok(value) => Theme::from_stored(&value),
            Err(e) => {
                tracing::debug!("No persisted theme ({}), defaulting to light", e);
                Theme::Light
            }
        }
    }

    /// Writes the theme preference; called on every toggle.
    pub fn save(&self, theme: Theme) -> Result<PathBuf, StorageError> {
        let path = self.theme_path();
        fs::write(&path, theme.as_str()).map_err(StorageError::Io)?;
        tracing::debug!("Saved theme '{}' to {}", theme.as_str(), path.display());
        Ok(path)
    }
}
