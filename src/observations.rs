//! Keyed surface observations.
//!
//! Observations are stored as a JSON object mapping a site name to its pressure (hPa),
//! temperature (C), dew point (C) and, optionally, a reported mixing ratio (g/kg):
//!
//! ```json
//! {
//!     "north_coast": { "pressure": 1000.0, "temperature": 20.0, "dew_point": 10.5 },
//!     "funchal": { "pressure": 1000.0, "temperature": 30.0, "dew_point": 1.4, "mixing_ratio": 4.2 }
//! }
//! ```
use crate::{
    config::Scenario,
    error::{ConfigError, Result},
    parcel::Parcel,
};
use metfor::{Celsius, HectoPascal};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// A surface observation at a single site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteObservation {
    /// Station pressure in hPa
    pub pressure: f64,
    /// Temperature in C
    pub temperature: f64,
    /// Dew point in C
    pub dew_point: f64,
    /// Reported mixing ratio in g/kg, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixing_ratio: Option<f64>,
}

impl SiteObservation {
    /// Convert to a parcel, checking it is physically valid.
    pub fn parcel(&self) -> Result<Parcel> {
        Parcel::new(
            HectoPascal(self.pressure),
            Celsius(self.temperature),
            Celsius(self.dew_point),
        )
    }
}

/// A collection of observations keyed by site name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observations {
    sites: BTreeMap<String, SiteObservation>,
}

impl Observations {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a site.
    pub fn with_site<S: Into<String>>(mut self, name: S, obs: SiteObservation) -> Self {
        self.sites.insert(name.into(), obs);
        self
    }

    /// The observations used for the Madeira case study.
    pub fn madeira() -> Self {
        Observations::new()
            .with_site(
                "north_coast",
                SiteObservation {
                    pressure: 1000.0,
                    temperature: 20.0,
                    dew_point: 10.5,
                    mixing_ratio: Some(8.0),
                },
            )
            .with_site(
                "funchal",
                SiteObservation {
                    pressure: 1000.0,
                    temperature: 30.0,
                    dew_point: 1.4,
                    mixing_ratio: Some(4.2),
                },
            )
    }

    /// Parse observations from JSON.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load observations from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Observations::from_json_str(&contents)
    }

    /// Serialize to pretty printed JSON.
    pub fn to_json_string(&self) -> std::result::Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get the observation for a site.
    pub fn site(&self, name: &str) -> std::result::Result<&SiteObservation, ConfigError> {
        self.sites
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSite(name.to_owned()))
    }

    /// Iterate over the sites in name order.
    pub fn sites(&self) -> impl Iterator<Item = (&str, &SiteObservation)> {
        self.sites.iter().map(|(name, obs)| (name.as_str(), obs))
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if there are no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Build a scenario that starts from the named windward site.
    pub fn scenario_for(
        &self,
        windward_site: &str,
        summit_pressure: HectoPascal,
    ) -> std::result::Result<Scenario, ConfigError> {
        let obs = self.site(windward_site)?;

        Ok(Scenario::new(
            windward_site,
            HectoPascal(obs.pressure),
            Celsius(obs.temperature),
            Celsius(obs.dew_point),
            summit_pressure,
        ))
    }
}
