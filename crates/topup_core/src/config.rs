use std::fs;

use serde::Deserialize;

/// Startup configuration for the wizard. One explicit read at startup
/// produces this; nothing else consults files or the environment later.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub currency_unit: String,
    pub country_code: String,
    pub messaging_base_url: String,
    pub preset_amounts: Vec<u32>,
    pub database_url: String,
    pub provider_feed_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_unit: "CUP".into(),
            country_code: "53".into(),
            messaging_base_url: "https://wa.me".into(),
            preset_amounts: vec![100, 250, 500, 1000],
            database_url: "sqlite://./data/wizard.db".into(),
            provider_feed_url: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    currency_unit: Option<String>,
    country_code: Option<String>,
    messaging_base_url: Option<String>,
    preset_amounts: Option<Vec<u32>>,
    database_url: Option<String>,
    provider_feed_url: Option<String>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("topup.toml") {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            if let Some(v) = file_cfg.currency_unit {
                settings.currency_unit = v;
            }
            if let Some(v) = file_cfg.country_code {
                settings.country_code = v;
            }
            if let Some(v) = file_cfg.messaging_base_url {
                settings.messaging_base_url = v;
            }
            if let Some(v) = file_cfg.preset_amounts {
                settings.preset_amounts = v;
            }
            if let Some(v) = file_cfg.database_url {
                settings.database_url = v;
            }
            if let Some(v) = file_cfg.provider_feed_url {
                settings.provider_feed_url = Some(v);
            }
        }
    }

    if let Ok(v) = std::env::var("TOPUP__DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("TOPUP__MESSAGING_BASE_URL") {
        settings.messaging_base_url = v;
    }
    if let Ok(v) = std::env::var("TOPUP__PROVIDER_FEED_URL") {
        settings.provider_feed_url = Some(v);
    }

    settings
}
