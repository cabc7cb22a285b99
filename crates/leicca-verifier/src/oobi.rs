//! OOBI URL construction and the (URL, controller) resolution cache (§4.2
//! Ordering: "OOBI resolutions are cacheable by (URL, controller) pair;
//! duplicate resolutions within a session MAY be skipped").

use std::collections::HashSet;

use tokio::sync::Mutex;

/// Build the OOBI URL the agent exposes for a given controller AID, e.g.
/// `{agentBaseURL}/oobi/{aid}/controller`. Shared by `resolveIssuerOobi` and
/// `configureRootOfTrust`.
pub fn controller_oobi_url(agent_base_url: &str, aid: &str) -> String {
    format!("{}/oobi/{}/controller", agent_base_url.trim_end_matches('/'), aid)
}

/// Build the OOBI URL the internal schema server exposes for a schema SAID.
pub fn schema_oobi_url(schema_server_url: &str, schema_said: &str) -> String {
    format!("{}/oobi/{}", schema_server_url.trim_end_matches('/'), schema_said)
}

/// Tracks which (oobi_url, controller) pairs have already been resolved
/// this session so duplicate resolutions can be skipped.
#[derive(Debug, Default)]
pub struct OobiCache {
    seen: Mutex<HashSet<(String, String)>>,
}

impl OobiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this is the first time `(url, controller)` has been
    /// seen (and records it), `false` if it was already resolved.
    pub async fn mark_if_new(&self, url: &str, controller: &str) -> bool {
        let mut seen = self.seen.lock().await;
        seen.insert((url.to_string(), controller.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_oobi_url_strips_trailing_slash() {
        assert_eq!(
            controller_oobi_url("https://agent.example/", "Eaid000000000000000000000000"),
            "https://agent.example/oobi/Eaid000000000000000000000000/controller"
        );
    }

    #[tokio::test]
    async fn cache_marks_new_pairs_and_skips_duplicates() {
        let cache = OobiCache::new();
        assert!(cache.mark_if_new("https://x/oobi", "Eaid1").await);
        assert!(!cache.mark_if_new("https://x/oobi", "Eaid1").await);
        assert!(cache.mark_if_new("https://x/oobi", "Eaid2").await);
    }
}
