//! `ProximitySource` using the OpenRouteService snap API.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use sitewise_core::ProximitySource;

use super::snap::{SnapRequest, SnapResponse};
use crate::{ClientBuildError, DEFAULT_USER_AGENT};

/// Public OpenRouteService endpoint.
pub const DEFAULT_ORS_URL: &str = "https://api.openrouteservice.org";

/// Distance reported when no measurement is available, in metres.
pub const DEFAULT_FALLBACK_DISTANCE_METERS: f64 = 1200.0;

/// Default routing profile.
const DEFAULT_PROFILE: &str = "driving-car";

/// Default snap search radius in metres.
const DEFAULT_SEARCH_RADIUS_METERS: f64 = 350.0;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`OrsProximitySource`].
#[derive(Clone)]
pub struct OrsConfig {
    /// Service root, e.g. `"https://api.openrouteservice.org"`.
    pub base_url: String,
    /// Routing profile in the endpoint path.
    pub profile: String,
    /// API key; `None` disables network lookups.
    pub api_key: Option<String>,
    /// Distance returned when a lookup cannot complete.
    pub fallback_distance_meters: f64,
    /// How far from the input the service searches for a road.
    pub search_radius_meters: f64,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl std::fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsConfig")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("fallback_distance_meters", &self.fallback_distance_meters)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORS_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            api_key: None,
            fallback_distance_meters: DEFAULT_FALLBACK_DISTANCE_METERS,
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OrsConfig {
    /// Create a configuration targeting `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key. Blank keys count as absent.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.trim().is_empty()).then_some(api_key);
        self
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the fallback distance.
    #[must_use]
    pub fn with_fallback_distance(mut self, metres: f64) -> Self {
        self.fallback_distance_meters = metres;
        self
    }

    /// Set the snap search radius.
    #[must_use]
    pub fn with_search_radius(mut self, metres: f64) -> Self {
        self.search_radius_meters = metres;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// OpenRouteService-backed proximity source.
#[derive(Debug, Clone)]
pub struct OrsProximitySource {
    client: Client,
    config: OrsConfig,
}

impl OrsProximitySource {
    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: OrsConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &OrsConfig {
        &self.config
    }

    /// Build the snap endpoint URL: `{base_url}/v2/snap/{profile}/json`.
    fn snap_url(&self) -> String {
        format!(
            "{}/v2/snap/{}/json",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }

    async fn request_distance(&self, api_key: &str, location: Coord<f64>) -> Result<f64, String> {
        let body = SnapRequest {
            locations: vec![[location.x, location.y]],
            radius: self.config.search_radius_meters,
        };
        let response = self
            .client
            .post(self.snap_url())
            .header(AUTHORIZATION, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("service returned {status}"));
        }
        let payload: SnapResponse = response
            .json()
            .await
            .map_err(|err| format!("malformed response: {err}"))?;
        payload
            .first_distance()
            .ok_or_else(|| "response carried no usable distance".to_owned())
    }
}

#[async_trait]
impl ProximitySource for OrsProximitySource {
    async fn snap_distance(&self, location: Coord<f64>) -> f64 {
        let fallback = self.config.fallback_distance_meters;
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no OpenRouteService key configured; using fallback {fallback} m");
            return fallback;
        };
        match self.request_distance(api_key, location).await {
            Ok(metres) => {
                debug!("snapped distance {metres} m");
                metres
            }
            Err(reason) => {
                warn!("OpenRouteService snap failed ({reason}); using fallback {fallback} m");
                fallback
            }
        }
    }

    fn fallback_distance(&self) -> f64 {
        self.config.fallback_distance_meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://ors.example.com", "https://ors.example.com/v2/snap/driving-car/json")]
    #[case("https://ors.example.com/", "https://ors.example.com/v2/snap/driving-car/json")]
    fn builds_snap_url(#[case] base: &str, #[case] expected: &str) {
        let source = OrsProximitySource::with_config(OrsConfig::new(base)).expect("client");
        assert_eq!(source.snap_url(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_keys_are_ignored(#[case] key: &str) {
        assert!(OrsConfig::default().with_api_key(key).api_key.is_none());
    }

    #[rstest]
    fn debug_redacts_api_key() {
        let config = OrsConfig::default().with_api_key("secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn defaults_match_service_conventions() {
        let config = OrsConfig::default();
        assert_eq!(config.fallback_distance_meters, DEFAULT_FALLBACK_DISTANCE_METERS);
        assert_eq!(config.profile, "driving-car");
        assert!(config.api_key.is_none());
    }
}
