use serde::Deserialize;

use crate::location::Location;
use crate::wait::WaitPolicy;

pub const MAPBOX_GLOBAL: &str = "mapboxgl";
pub const MAPBOX_JS_URL: &str = "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.js";
pub const MAPBOX_CSS_URL: &str = "https://api.mapbox.com/mapbox-gl-js/v3.3.0/mapbox-gl.css";
pub const MAP_STYLE: &str = "mapbox://styles/mapbox/outdoors-v12";

pub const MAP_CONTAINER_ID: &str = "map";
pub const STANDARD_FILTERS_ID: &str = "standard-filters";
pub const TAG_FILTERS_ID: &str = "tag-filters";

// Continental US.
pub const MAP_CENTER: [f64; 2] = [-98.5556199, 39.8097343];
pub const MAP_ZOOM: f64 = 2.0;
pub const MAP_MIN_ZOOM: f64 = 2.0;
pub const MAP_MAX_ZOOM: f64 = 12.0;

pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;
pub const DEFAULT_WAIT_TIMEOUT_MS: u32 = 15_000;

/// Options passed by the page to `init`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    #[serde(default)]
    pub locations: Option<Vec<Location>>,
    #[serde(default, alias = "mapboxToken")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u32>,
    #[serde(default)]
    pub wait_timeout_ms: Option<u32>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InitError {
    #[error("map container #{0} is not on this page")]
    MissingContainer(String),
    #[error("Mapbox access token is missing")]
    MissingToken,
    #[error("locations are missing")]
    MissingLocations,
    #[error("location at index {index} has a blank slug")]
    BlankSlug { index: usize },
}

impl InitError {
    /// Pages without a map container are not an error worth shouting about.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::MissingContainer(_))
    }
}

/// Everything `init` needs once preconditions hold.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub container_id: String,
    pub access_token: String,
    pub locations: Vec<Location>,
    pub wait: WaitPolicy,
    pub debug: bool,
}

impl InitOptions {
    pub fn container_id(&self) -> &str {
        self.container_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(MAP_CONTAINER_ID)
    }

    /// Check every precondition before anything is touched.
    /// `container_present` answers whether the container id exists in the page.
    pub fn preflight(
        self,
        container_present: impl FnOnce(&str) -> bool,
    ) -> Result<MapConfig, InitError> {
        let container_id = self.container_id().to_string();
        if !container_present(&container_id) {
            return Err(InitError::MissingContainer(container_id));
        }

        let access_token = self
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(InitError::MissingToken)?;

        let locations = self
            .locations
            .filter(|l| !l.is_empty())
            .ok_or(InitError::MissingLocations)?;
        if let Some(index) = locations.iter().position(|l| l.slug.trim().is_empty()) {
            return Err(InitError::BlankSlug { index });
        }

        let wait = WaitPolicy::new(
            self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            self.wait_timeout_ms.unwrap_or(DEFAULT_WAIT_TIMEOUT_MS),
        );

        Ok(MapConfig {
            container_id,
            access_token,
            locations,
            wait,
            debug: self.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::sample;

    fn options() -> InitOptions {
        InitOptions {
            locations: Some(vec![sample("a", "gold", &["beef"])]),
            access_token: Some("pk.test".into()),
            ..Default::default()
        }
    }

    #[test]
    fn preflight_applies_defaults() {
        let config = options().preflight(|id| id == "map").unwrap();
        assert_eq!(config.container_id, "map");
        assert_eq!(config.access_token, "pk.test");
        assert_eq!(config.wait, WaitPolicy::new(100, 15_000));
        assert!(!config.debug);
    }

    #[test]
    fn missing_container_is_silent() {
        let err = options().preflight(|_| false).unwrap_err();
        assert_eq!(err, InitError::MissingContainer("map".into()));
        assert!(err.is_silent());
    }

    #[test]
    fn container_is_checked_before_token() {
        let opts = InitOptions {
            access_token: None,
            ..options()
        };
        assert!(matches!(
            opts.preflight(|_| false),
            Err(InitError::MissingContainer(_))
        ));
    }

    #[test]
    fn blank_token_is_missing() {
        let opts = InitOptions {
            access_token: Some("   ".into()),
            ..options()
        };
        let err = opts.preflight(|_| true).unwrap_err();
        assert_eq!(err, InitError::MissingToken);
        assert!(!err.is_silent());
    }

    #[test]
    fn empty_locations_are_missing() {
        let opts = InitOptions {
            locations: Some(Vec::new()),
            ..options()
        };
        assert_eq!(
            opts.preflight(|_| true).unwrap_err(),
            InitError::MissingLocations
        );
    }

    #[test]
    fn blank_slug_fails_the_whole_init() {
        let opts = InitOptions {
            locations: Some(vec![
                sample("a", "gold", &[]),
                sample("  ", "gold", &[]),
                sample("", "silver", &[]),
            ]),
            ..options()
        };
        let err = opts.preflight(|_| true).unwrap_err();
        assert_eq!(err, InitError::BlankSlug { index: 1 });
        assert!(!err.is_silent());
    }

    #[test]
    fn deserializes_page_options() {
        let json = r#"{
            "locations": [{"slug":"a","name":"A","lat":1,"lng":2,"standard":"gold"}],
            "mapboxToken": "pk.abc",
            "debug": true,
            "containerId": "home-map",
            "pollIntervalMs": 50
        }"#;
        let opts: InitOptions = serde_json::from_str(json).unwrap();
        let config = opts.preflight(|id| id == "home-map").unwrap();
        assert!(config.debug);
        assert_eq!(config.access_token, "pk.abc");
        assert_eq!(config.wait.interval_ms, 50);
        assert_eq!(config.wait.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
    }
}
