//! Environment-driven configuration (§6 Environment).

use std::env;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
}

#[derive(Debug, Clone)]
pub struct LeiccaConfig {
    /// `MINTBLUE_SDK_TOKEN` (required) — wallet SDK credential.
    pub mintblue_sdk_token: String,
    /// `BLOCKCHAIN_NETWORK` in {main, test}, default `main`.
    pub blockchain_network: String,
    pub vlei_verifier_url: String,
    /// `SCHEMA_SERVER_URL` — serves the ACDC schema OOBIs the verifier resolves.
    pub schema_server_url: String,
    pub keria_agent_url: String,
    pub gleif_api_base: String,
    pub data_dir: PathBuf,
}

impl LeiccaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mintblue_sdk_token: env::var("MINTBLUE_SDK_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("MINTBLUE_SDK_TOKEN".to_string()))?,
            blockchain_network: env::var("BLOCKCHAIN_NETWORK").unwrap_or_else(|_| "main".to_string()),
            vlei_verifier_url: env::var("VLEI_VERIFIER_URL").unwrap_or_else(|_| "http://localhost:7676".to_string()),
            schema_server_url: env::var("SCHEMA_SERVER_URL").unwrap_or_else(|_| "http://localhost:7723".to_string()),
            keria_agent_url: env::var("KERIA_AGENT_URL").unwrap_or_else(|_| "http://localhost:3901".to_string()),
            gleif_api_base: env::var("GLEIF_API_BASE").unwrap_or_else(|_| "https://api.gleif.org".to_string()),
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("./data")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_reported_by_name() {
        // SAFETY: test-only env mutation, single-threaded test binary assumption
        // matches how the rest of the workspace's config tests behave.
        unsafe { env::remove_var("MINTBLUE_SDK_TOKEN") };
        let err = LeiccaConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "MINTBLUE_SDK_TOKEN"));
    }
}
