use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::MigrationError;

pub const DEFAULT_SUPABASE_URL: &str = "https://qccrfgkfcdcezxzdtfpk.supabase.co";
pub const DEFAULT_CONFIG_FILE: &str = "opelle-migrate.toml";
pub const ENV_PREFIX: &str = "OPELLE";

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub supabase_url: String,
    #[serde(default)]
    pub service_role_key: Option<String>,
}

impl AppConfig {
    /// Defaults, then the optional config file, then `OPELLE_*` environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self, MigrationError> {
        let file = config_path
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let settings = config::Config::builder()
            .set_default("supabase_url", DEFAULT_SUPABASE_URL)?
            .add_source(config::File::with_name(&file).required(config_path.is_some()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        // An exported-but-empty variable counts as unset.
        if config.service_role_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.service_role_key = None;
        }
        Ok(config)
    }

    /// The service-role key, or a configuration error when it is unset
    pub fn require_service_key(&self) -> Result<&str, MigrationError> {
        self.service_role_key
            .as_deref()
            .ok_or_else(|| MigrationError::missing_key("service_role_key"))
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("supabase_url", &self.supabase_url)
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
