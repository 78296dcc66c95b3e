//! Environment-driven settings.
//!
//! Everything the tool reads from the environment is resolved once here and
//! passed down explicitly. A `.env` file in the working directory is honored.

use crate::domain::ScopeMode;
use crate::error::AppError;

pub const DEFAULT_TEAM_NAME: &str = "Default Team";
pub const DEFAULT_DB_HOSTNAME: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 8428;
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Overrides the campaign name derived from the export filename.
    pub campaign_name: Option<String>,
    /// Overrides the event name derived from the export filename.
    pub event_name: Option<String>,
    pub team_name: String,
    pub db_hostname: String,
    pub db_port: u16,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_port = match get("DB_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid DB_PORT '{raw}': {e}")))?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            campaign_name: get("CAMPAIGN_NAME"),
            event_name: get("EVENT_NAME"),
            team_name: get("TEAM_NAME").unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string()),
            db_hostname: get("DB_HOSTNAME").unwrap_or_else(|| DEFAULT_DB_HOSTNAME.to_string()),
            db_port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Base URL of the metrics store, e.g. `http://localhost:8428`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.db_hostname, self.db_port)
    }

    /// Scope name override for the given mode, if one is configured.
    pub fn scope_override(&self, mode: ScopeMode) -> Option<&str> {
        match mode {
            ScopeMode::Campaign | ScopeMode::CampaignTeam => self.campaign_name.as_deref(),
            ScopeMode::Event => self.event_name.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.campaign_name, None);
        assert_eq!(settings.event_name, None);
        assert_eq!(settings.team_name, "Default Team");
        assert_eq!(settings.base_url(), "http://localhost:8428");
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let settings = settings_from(&[("CAMPAIGN_NAME", ""), ("TEAM_NAME", "  ")]).unwrap();
        assert_eq!(settings.campaign_name, None);
        assert_eq!(settings.team_name, DEFAULT_TEAM_NAME);
    }

    #[test]
    fn overrides_follow_the_mode() {
        let settings = settings_from(&[("CAMPAIGN_NAME", "Spring"), ("EVENT_NAME", "GDQ")]).unwrap();
        assert_eq!(settings.scope_override(ScopeMode::Campaign), Some("Spring"));
        assert_eq!(settings.scope_override(ScopeMode::CampaignTeam), Some("Spring"));
        assert_eq!(settings.scope_override(ScopeMode::Event), Some("GDQ"));
    }

    #[test]
    fn custom_host_and_port() {
        let settings = settings_from(&[("DB_HOSTNAME", "vm.internal"), ("DB_PORT", "9428")]).unwrap();
        assert_eq!(settings.base_url(), "http://vm.internal:9428");
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = settings_from(&[("DB_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
