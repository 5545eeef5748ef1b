// SPDX-License-Identifier: MIT
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::PaperSize;

/// Fallback output name when the user leaves the name field empty.
pub const DEFAULT_OUTPUT_NAME: &str = "converted-images";

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name pre-filled in the output name field.
    pub default_output_name: String,
    /// Paper size for exported documents.
    pub paper_size: PaperSize,
    /// Dark mode preference. `None` means follow the platform.
    pub dark_mode: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_name: DEFAULT_OUTPUT_NAME.into(),
            paper_size: PaperSize::A4,
            dark_mode: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_output_name, "converted-images");
        assert_eq!(config.paper_size, PaperSize::A4);
        assert!(config.dark_mode.is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = AppConfig::default();
        config.dark_mode = Some(true);
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dark_mode, Some(true));
        assert_eq!(back.paper_size, config.paper_size);
    }
}
