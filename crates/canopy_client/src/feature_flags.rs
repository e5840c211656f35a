//! Feature flags fetched from the backend.
//!
//! The one collaborator failure the client recovers from with a default: any
//! fetch problem degrades to an empty mapping instead of failing the surface.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

pub const FEATURE_FLAGS_ROUTE: &str = "/feature-flags";

/// Short timeout for the metadata fetch, separate from the streaming call.
pub const FEATURE_FLAGS_TIMEOUT: Duration = Duration::from_secs(10);

pub const FLAG_SUMMARIZATION: &str = "summarization";
pub const FLAG_RAG: &str = "rag-feature";
pub const FLAG_CONTENT_CREATION: &str = "content-creation";
pub const FLAG_ASSIGNMENT_SCORING: &str = "assignment-scoring";

/// Named boolean capabilities advertised by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags {
    flags: HashMap<String, bool>,
}

impl FeatureFlags {
    pub fn is_enabled(&self, name: &str, default: bool) -> bool {
        self.flags.get(name).copied().unwrap_or(default)
    }

    /// Summarization ships enabled unless the backend turns it off.
    pub fn summarization_enabled(&self) -> bool {
        self.is_enabled(FLAG_SUMMARIZATION, true)
    }

    pub fn rag_enabled(&self) -> bool {
        self.is_enabled(FLAG_RAG, false)
    }

    pub fn content_creation_enabled(&self) -> bool {
        self.is_enabled(FLAG_CONTENT_CREATION, false)
    }

    pub fn assignment_scoring_enabled(&self) -> bool {
        self.is_enabled(FLAG_ASSIGNMENT_SCORING, false)
    }

    /// Whether the backend advertises any capability at all.
    pub fn any_enabled(&self) -> bool {
        self.flags.values().any(|enabled| *enabled)
    }
}

/// GET `{base}/feature-flags` with a short timeout.
///
/// Transport errors, non-2xx statuses, and bad JSON all degrade to the empty
/// mapping with a warning.
pub async fn fetch_feature_flags(client: &reqwest::Client, base_url: &str) -> FeatureFlags {
    let url = format!("{}{}", base_url.trim_end_matches('/'), FEATURE_FLAGS_ROUTE);

    let response = match client
        .get(&url)
        .timeout(FEATURE_FLAGS_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            log::warn!("failed to fetch feature flags from {url}: {err}");
            return FeatureFlags::default();
        }
    };

    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(err) => {
            log::warn!("feature flags endpoint returned an error: {err}");
            return FeatureFlags::default();
        }
    };

    match response.json().await {
        Ok(flags) => flags,
        Err(err) => {
            log::warn!("failed to decode feature flags: {err}");
            FeatureFlags::default()
        }
    }
}
