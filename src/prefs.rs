use std::path::Path;

use serde::{Deserialize, Serialize};

/// The binary theme choice, persisted between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    pub theme: Theme,
}

impl Prefs {
    /// Read once at startup. A missing or unreadable file is the normal
    /// first run and yields the defaults.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Written on every toggle.
    pub fn store(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self).unwrap())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toggle_flips_both_ways() {
        assert_eq!(Theme::Light, Theme::Dark.toggled());
        assert_eq!(Theme::Dark, Theme::Light.toggled());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("hue_hunt_no_such_prefs.json");
        assert_eq!(Prefs::default(), Prefs::load(&path));
    }

    #[test]
    fn test_garbage_file_yields_defaults() {
        let path = std::env::temp_dir().join("hue_hunt_garbage_prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Prefs::default(), Prefs::load(&path));
    }

    #[test]
    fn test_store_then_load_round_trips() {
        let path = std::env::temp_dir().join("hue_hunt_prefs_roundtrip.json");
        let prefs = Prefs {
            theme: Theme::Light,
        };
        prefs.store(&path).unwrap();
        assert_eq!(prefs, Prefs::load(&path));
    }

    #[test]
    fn test_theme_serializes_to_its_fixed_name() {
        let json = serde_json::to_string(&Prefs {
            theme: Theme::Light,
        })
        .unwrap();
        assert_eq!(r#"{"theme":"light"}"#, json);
    }
}
