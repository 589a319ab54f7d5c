//! Game selection settings
//!
//! What the settings panel reads and writes: which layout file to fetch,
//! and from where. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::layout::layout_url;

/// Layout names the asset server ships with.
pub const PRESET_GAMES: [&str; 5] = ["game01", "game02", "game03", "game04", "game05"];

/// Ports the classroom asset server is known to run on.
pub const PRESET_PORTS: [u16; 3] = [3000, 5500, 8080];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    /// Layout name, without the `.json` extension
    pub filename: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            filename: PRESET_GAMES[0].to_string(),
            port: PRESET_PORTS[0],
        }
    }
}

impl Settings {
    /// URL of the currently selected layout.
    pub fn url(&self) -> String {
        layout_url(&self.host, self.port, &self.filename)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "block_match_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let settings = Settings::default();
        assert_eq!(settings.url(), "http://localhost:3000/assets/games/game01.json");
    }

    #[test]
    fn test_roundtrips_through_json() {
        let settings = Settings {
            host: "10.0.0.5".into(),
            filename: "game03".into(),
            port: 5500,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), settings);
    }
}
