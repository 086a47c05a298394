//! Persisted UI theme preference. The state file plays the role the browser's
//! local storage plays for the front-end: a single three-valued mode.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DocsError, DocsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "auto" => Some(Theme::Auto),
            _ => None,
        }
    }
}

pub struct ThemeService {
    path: PathBuf,
    current: Mutex<Theme>,
}

impl ThemeService {
    /// A missing or unreadable state file falls back to the default mode.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = Self::load(&path).unwrap_or_default();
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    fn load(path: &Path) -> Option<Theme> {
        let text = std::fs::read_to_string(path).ok()?;
        let theme = Theme::parse(&text);
        if theme.is_none() {
            warn!(path = %path.display(), "ignoring corrupt theme state");
        }
        theme
    }

    fn lock(&self) -> MutexGuard<'_, Theme> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> Theme {
        *self.lock()
    }

    pub fn set(&self, theme: Theme) -> DocsResult<Theme> {
        *self.lock() = theme;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DocsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, theme.as_str()).map_err(|source| DocsError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(theme)
    }

    /// light → dark, dark → light, auto → light.
    pub fn toggle(&self) -> DocsResult<Theme> {
        let next = match self.get() {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
            Theme::Auto => Theme::Light,
        };
        self.set(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (ThemeService, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = ThemeService::new(dir.path().join("theme"));
        (service, dir)
    }

    #[test]
    fn defaults_to_light() {
        let (service, _dir) = service();
        assert_eq!(service.get(), Theme::Light);
    }

    #[test]
    fn set_persists_across_instances() {
        let (service, dir) = service();
        service.set(Theme::Dark).expect("set");
        let reloaded = ThemeService::new(dir.path().join("theme"));
        assert_eq!(reloaded.get(), Theme::Dark);
    }

    #[test]
    fn toggle_cycles_light_and_dark() {
        let (service, _dir) = service();
        assert_eq!(service.toggle().expect("toggle"), Theme::Dark);
        assert_eq!(service.toggle().expect("toggle"), Theme::Light);
        service.set(Theme::Auto).expect("set");
        assert_eq!(service.toggle().expect("toggle"), Theme::Light);
    }

    #[test]
    fn corrupt_state_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("theme");
        std::fs::write(&path, "neon").expect("write");
        let service = ThemeService::new(&path);
        assert_eq!(service.get(), Theme::Light);
    }
}
