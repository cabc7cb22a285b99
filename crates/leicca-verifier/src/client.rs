//! The VerifierClient (§4.2): drives OOBI resolution, Root-of-Trust
//! configuration and the presentation/authorization state machine.

use std::time::Duration;

use crate::detail;
use crate::error::VerifierError;
use crate::oobi::{self, OobiCache};
use crate::types::{OobiRequest, PresentationAccepted, VerifierErrorBody, VerifierResult, VerifierState};

const OOBI_TIMEOUT: Duration = Duration::from_secs(10);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const ROOT_OF_TRUST_TIMEOUT: Duration = Duration::from_secs(60);

const SCHEMA_OOBI_SETTLE: Duration = Duration::from_millis(1_000);
const ISSUER_OOBI_SETTLE: Duration = Duration::from_millis(2_500);

/// Drives the external vLEI verifier's HTTP protocol. Holds no per-request
/// state beyond the OOBI resolution cache (keyed by `(url, controller)`,
/// safe to share behind one shared `VerifierClient` instance).
#[derive(Debug)]
pub struct VerifierClient {
    http: reqwest::Client,
    verifier_base_url: String,
    schema_server_url: String,
    agent_base_url: String,
    oobi_cache: OobiCache,
}

impl VerifierClient {
    pub fn new(
        verifier_base_url: impl Into<String>,
        schema_server_url: impl Into<String>,
        agent_base_url: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("leicca-verifier/0.1")
            .build()
            .expect("failed to build verifier HTTP client");

        Self {
            http,
            verifier_base_url: verifier_base_url.into(),
            schema_server_url: schema_server_url.into(),
            agent_base_url: agent_base_url.into(),
            oobi_cache: OobiCache::new(),
        }
    }

    /// Resolve the schema's OOBI, then pause 1 s (mandatory, not optional).
    pub async fn resolve_schema_oobi(&self, schema_said: &str) -> Result<(), VerifierError> {
        let url = oobi::schema_oobi_url(&self.schema_server_url, schema_said);
        if !self.oobi_cache.mark_if_new(&url, schema_said).await {
            tracing::debug!(schema_said, "schema OOBI already resolved this session");
            return Ok(());
        }
        self.post_oobi(&url).await?;
        tokio::time::sleep(SCHEMA_OOBI_SETTLE).await;
        Ok(())
    }

    /// Resolve the issuer's OOBI, then pause 2.5 s so the verifier can fetch
    /// the issuer's KEL from witnesses asynchronously.
    pub async fn resolve_issuer_oobi(&self, issuer_aid: &str) -> Result<(), VerifierError> {
        let url = oobi::controller_oobi_url(&self.agent_base_url, issuer_aid);
        if !self.oobi_cache.mark_if_new(&url, issuer_aid).await {
            tracing::debug!(issuer_aid, "issuer OOBI already resolved this session");
            return Ok(());
        }
        self.post_oobi(&url).await?;
        tokio::time::sleep(ISSUER_OOBI_SETTLE).await;
        Ok(())
    }

    async fn post_oobi(&self, oobi_url: &str) -> Result<(), VerifierError> {
        let resp = self
            .http
            .post(format!("{}/oobi", self.verifier_base_url.trim_end_matches('/')))
            .timeout(OOBI_TIMEOUT)
            .json(&OobiRequest { url: oobi_url.to_string() })
            .send()
            .await
            .map_err(|e| classify_error(e, OOBI_TIMEOUT))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(VerifierError::Unreachable(format!("OOBI resolution returned HTTP {}", resp.status())))
        }
    }

    /// Required once per local QVI when GLEIF delegation is unavailable.
    pub async fn configure_root_of_trust(
        &self,
        qvi_aid: &str,
        qvi_cesr: &str,
        agent_base_url: &str,
    ) -> Result<(), VerifierError> {
        let oobi_url = oobi::controller_oobi_url(agent_base_url, qvi_aid);
        let resp = self
            .http
            .post(format!(
                "{}/root_of_trust/{}",
                self.verifier_base_url.trim_end_matches('/'),
                qvi_aid
            ))
            .timeout(ROOT_OF_TRUST_TIMEOUT)
            .json(&serde_json::json!({ "oobi": oobi_url, "vlei": qvi_cesr }))
            .send()
            .await
            .map_err(|e| classify_error(e, ROOT_OF_TRUST_TIMEOUT))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(VerifierError::Unreachable(format!(
                "root-of-trust configuration returned HTTP {}",
                resp.status()
            )))
        }
    }

    /// Runs the full presentation/authorization state machine for one
    /// credential. Resolves the issuer's OOBI first if one can be extracted
    /// from `cesr` (the verifier otherwise lacks the issuer's KEL).
    pub async fn verify_credential(&self, cesr: &str, said: &str) -> Result<VerifierResult, VerifierError> {
        if let Some(issuer_aid) = leicca_core::extract_issuer_aid(cesr) {
            self.resolve_issuer_oobi(issuer_aid.as_str()).await?;
        }

        let state = match self.submit_presentation(cesr, said).await? {
            VerifierState::Submitted(aid) => self.get_authorization(&aid).await?,
            terminal => terminal,
        };

        Ok(reconcile(state))
    }

    async fn submit_presentation(&self, cesr: &str, said: &str) -> Result<VerifierState, VerifierError> {
        let resp = self
            .http
            .put(format!(
                "{}/presentations/{}",
                self.verifier_base_url.trim_end_matches('/'),
                said
            ))
            .timeout(SUBMIT_TIMEOUT)
            .header("Content-Type", "application/json+cesr")
            .body(cesr.to_string())
            .send()
            .await
            .map_err(|e| classify_error(e, SUBMIT_TIMEOUT))?;

        match resp.status().as_u16() {
            200 | 202 => {
                let body: PresentationAccepted = resp
                    .json()
                    .await
                    .map_err(|e| VerifierError::Unknown(e.to_string()))?;
                Ok(VerifierState::Submitted(body.aid))
            }
            400 => {
                let body = resp.json::<VerifierErrorBody>().await.unwrap_or_default();
                Ok(VerifierState::CryptoFailed(detail::crypto_failure_hints(&body.msg)))
            }
            503 => Ok(VerifierState::Errored(vec!["verifier is busy".to_string()])),
            other => Err(VerifierError::Unknown(format!(
                "unexpected HTTP {other} from presentation submit"
            ))),
        }
    }

    async fn get_authorization(&self, aid: &str) -> Result<VerifierState, VerifierError> {
        let resp = self
            .http
            .get(format!(
                "{}/authorizations/{}",
                self.verifier_base_url.trim_end_matches('/'),
                aid
            ))
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify_error(e, SUBMIT_TIMEOUT))?;

        match resp.status().as_u16() {
            200 => Ok(VerifierState::Authorized),
            401 => {
                let body = resp.json::<VerifierErrorBody>().await.unwrap_or_default();
                Ok(VerifierState::Unauthorized(detail::unauthorized_reasons(&body.info)))
            }
            404 => Ok(VerifierState::NotFound),
            other => Err(VerifierError::Unknown(format!(
                "unexpected HTTP {other} from authorization check"
            ))),
        }
    }

    /// `GET /health`, 5 s timeout.
    pub async fn check_health(&self) -> bool {
        let resp = self
            .http
            .get(format!("{}/health", self.verifier_base_url.trim_end_matches('/')))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;
        matches!(resp, Ok(r) if r.status().is_success())
    }
}

fn classify_error(e: reqwest::Error, timeout: Duration) -> VerifierError {
    if e.is_timeout() {
        VerifierError::Timeout(timeout)
    } else {
        VerifierError::Unreachable(e.to_string())
    }
}

/// Reconcile a terminal state machine state into the uniform result the
/// caller sees. `Unauthorized` is the one non-obvious case: cryptographically
/// sound but policy-rejected, so `verified` stays `true` while
/// `qvi_chain_valid` flips to `false`.
fn reconcile(state: VerifierState) -> VerifierResult {
    match state {
        VerifierState::Authorized => VerifierResult {
            verified: true,
            said_valid: true,
            qvi_chain_valid: true,
            registry_checked: true,
            errors: vec![],
        },
        VerifierState::Unauthorized(reasons) => VerifierResult {
            verified: true,
            said_valid: true,
            qvi_chain_valid: false,
            registry_checked: true,
            errors: reasons,
        },
        VerifierState::CryptoFailed(reasons) => VerifierResult {
            verified: false,
            said_valid: false,
            qvi_chain_valid: false,
            registry_checked: false,
            errors: reasons,
        },
        VerifierState::NotFound => VerifierResult {
            verified: false,
            said_valid: false,
            qvi_chain_valid: false,
            registry_checked: false,
            errors: vec!["presentation not found".to_string()],
        },
        VerifierState::Errored(reasons) => VerifierResult {
            verified: false,
            said_valid: false,
            qvi_chain_valid: false,
            registry_checked: false,
            errors: reasons,
        },
        VerifierState::Submitted(_) => unreachable!("Submitted is never a terminal state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_authorized_is_fully_verified() {
        let result = reconcile(VerifierState::Authorized);
        assert!(result.verified);
        assert!(result.qvi_chain_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn reconcile_unauthorized_is_crypto_sound_but_policy_rejected() {
        let result = reconcile(VerifierState::Unauthorized(vec!["LEI ... not allowed".to_string()]));
        assert!(result.verified);
        assert!(result.said_valid);
        assert!(!result.qvi_chain_valid);
        assert_eq!(result.errors, vec!["LEI ... not allowed".to_string()]);
    }

    #[test]
    fn reconcile_crypto_failed_is_entirely_unverified() {
        let result = reconcile(VerifierState::CryptoFailed(vec!["tampered".to_string()]));
        assert!(!result.verified);
        assert!(!result.said_valid);
    }

    #[test]
    fn reconcile_not_found_reports_a_specific_error() {
        let result = reconcile(VerifierState::NotFound);
        assert!(!result.verified);
        assert_eq!(result.errors, vec!["presentation not found".to_string()]);
    }
}
