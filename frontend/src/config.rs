use log::Level;
use std::str::FromStr;

/// Build-time client settings. Trunk forwards the build environment, so both
/// values can be set when running `trunk build`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub log_level: Level,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_values(option_env!("PLANT_API_BASE"), option_env!("PLANT_LOG_LEVEL"))
    }

    fn from_values(api_base: Option<&str>, log_level: Option<&str>) -> Self {
        let api_base = api_base.unwrap_or_default().trim().trim_end_matches('/').to_string();
        let log_level = log_level
            .and_then(|raw| Level::from_str(raw.trim()).ok())
            .unwrap_or(Level::Info);

        Self { api_base, log_level }
    }

    /// Absolute URL for an endpoint path such as `/api/history`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_same_origin_and_info() {
        let config = AppConfig::default();
        assert_eq!(config.url("/api/history"), "/api/history");
        assert_eq!(config.log_level, Level::Info);
    }

    #[test]
    fn trims_trailing_slash_and_parses_level() {
        let config = AppConfig::from_values(Some("http://localhost:8000/"), Some("debug"));
        assert_eq!(config.url("/health"), "http://localhost:8000/health");
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let config = AppConfig::from_values(None, Some("loud"));
        assert_eq!(config.log_level, Level::Info);
    }
}
