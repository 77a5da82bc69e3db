//! Options and input scenarios for a Foehn analysis.
//!
//! A [`Scenario`] bundles the four observed inputs with the [`PathOptions`] that control the
//! moisture budget and the numerics. Scenarios can be built in code, taken from a preset, or read
//! from JSON:
//!
//! ```json
//! {
//!     "name": "Madeira",
//!     "surface_pressure": 1000.0,
//!     "surface_temperature": 20.0,
//!     "surface_dew_point": 10.5,
//!     "summit_pressure": 400.0,
//!     "options": { "precipitation_efficiency": 0.5 }
//! }
//! ```
use crate::{
    error::{AnalysisError, ConfigError, Result},
    foehn::{compute_fohn_profile_with, FoehnAnalysis},
};
use metfor::{Celsius, HectoPascal, Quantity};
use optional::{none, some, Optioned};
use serde::Deserialize;
use std::path::Path;

/// Smallest integration step or sample interval accepted, hPa.
const MIN_PRESSURE_STEP: f64 = 0.01;

/// Most bisection iterations accepted for a condensation level search.
const MAX_ITERATIONS_LIMIT: usize = 1_000;

/// Options controlling how a parcel path is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOptions {
    /// Fraction of the condensate formed during the moist ascent that falls out as precipitation,
    /// 0 to 1. What remains is carried over the summit as cloud water and evaporates on the way
    /// down. The default of 0.515 reproduces the Madeira case.
    pub precipitation_efficiency: f64,
    /// Largest pressure sub-step used when integrating the moist adiabat, hPa. At least 0.01.
    pub integration_step: f64,
    /// Nominal pressure spacing between samples of the path, hPa. At least 0.01.
    pub sample_interval: f64,
    /// Width of the final pressure bracket when searching for a condensation level, hPa.
    pub pressure_tolerance: f64,
    /// Maximum number of bisection iterations for each condensation level search, 1 to 1000.
    pub max_iterations: usize,
    /// Surface pressure on the lee side. Missing means the same as the windward surface.
    pub leeward_surface_pressure: Optioned<HectoPascal>,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            precipitation_efficiency: 0.515,
            integration_step: 1.0,
            sample_interval: 10.0,
            pressure_tolerance: 0.1,
            max_iterations: 100,
            leeward_surface_pressure: none(),
        }
    }
}

impl PathOptions {
    /// Builder method to set the precipitation efficiency.
    pub fn with_precipitation_efficiency(self, precipitation_efficiency: f64) -> Self {
        PathOptions {
            precipitation_efficiency,
            ..self
        }
    }

    /// Builder method to set the moist adiabat integration step.
    pub fn with_integration_step(self, integration_step: f64) -> Self {
        PathOptions {
            integration_step,
            ..self
        }
    }

    /// Builder method to set the sample spacing.
    pub fn with_sample_interval(self, sample_interval: f64) -> Self {
        PathOptions {
            sample_interval,
            ..self
        }
    }

    /// Builder method to set the pressure tolerance and iteration cap of the condensation level
    /// searches.
    pub fn with_root_finding(self, pressure_tolerance: f64, max_iterations: usize) -> Self {
        PathOptions {
            pressure_tolerance,
            max_iterations,
            ..self
        }
    }

    /// Builder method to set the leeward surface pressure.
    pub fn with_leeward_surface_pressure<T>(self, pressure: T) -> Self
    where
        Optioned<HectoPascal>: From<T>,
    {
        PathOptions {
            leeward_surface_pressure: Optioned::from(pressure),
            ..self
        }
    }

    /// Check the options are usable.
    pub fn validate(&self) -> Result<()> {
        let pe = self.precipitation_efficiency;
        if !(0.0..=1.0).contains(&pe) {
            return Err(AnalysisError::invalid(format!(
                "precipitation efficiency must be between 0 and 1, got {}",
                pe
            )));
        }

        for &(val, name) in &[
            (self.integration_step, "integration step"),
            (self.sample_interval, "sample interval"),
        ] {
            if !(val.is_finite() && val >= MIN_PRESSURE_STEP) {
                return Err(AnalysisError::invalid(format!(
                    "{} must be at least {} hPa, got {}",
                    name, MIN_PRESSURE_STEP, val
                )));
            }
        }

        let tol = self.pressure_tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            return Err(AnalysisError::invalid(format!(
                "pressure tolerance must be positive, got {}",
                tol
            )));
        }

        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(AnalysisError::invalid(format!(
                "max iterations must be between 1 and {}, got {}",
                MAX_ITERATIONS_LIMIT, self.max_iterations
            )));
        }

        if let Some(p) = self.leeward_surface_pressure.into_option() {
            if !p.unpack().is_finite() {
                return Err(AnalysisError::invalid("leeward surface pressure is not finite"));
            }
        }

        Ok(())
    }
}

/// The observed inputs of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Name used in reports.
    pub name: String,
    /// Windward surface pressure.
    pub surface_pressure: HectoPascal,
    /// Windward surface temperature.
    pub surface_temperature: Celsius,
    /// Windward surface dew point.
    pub surface_dew_point: Celsius,
    /// Pressure at the mountain top.
    pub summit_pressure: HectoPascal,
    /// How to compute the path.
    pub options: PathOptions,
}

impl Scenario {
    /// Create a new scenario with default options.
    pub fn new<S: Into<String>>(
        name: S,
        surface_pressure: HectoPascal,
        surface_temperature: Celsius,
        surface_dew_point: Celsius,
        summit_pressure: HectoPascal,
    ) -> Self {
        Scenario {
            name: name.into(),
            surface_pressure,
            surface_temperature,
            surface_dew_point,
            summit_pressure,
            options: PathOptions::default(),
        }
    }

    /// Moist north-easterly flow over Madeira descending to Funchal on the south coast.
    pub fn madeira() -> Self {
        Scenario::new(
            "Madeira Island",
            HectoPascal(1000.0),
            Celsius(20.0),
            Celsius(10.5),
            HectoPascal(400.0),
        )
    }

    /// A generic starting point for custom runs.
    pub fn custom_preset() -> Self {
        Scenario::new(
            "Custom",
            HectoPascal(1013.0),
            Celsius(18.0),
            Celsius(12.0),
            HectoPascal(500.0),
        )
    }

    /// Look up a preset by name, `madeira` or `custom`.
    pub fn preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "madeira" => Ok(Scenario::madeira()),
            "custom" => Ok(Scenario::custom_preset()),
            _ => Err(ConfigError::UnknownPreset(name.to_owned())),
        }
    }

    /// Builder method to replace the options.
    pub fn with_options(self, options: PathOptions) -> Self {
        Scenario { options, ..self }
    }

    /// Parse a scenario from JSON. Options not given take their defaults.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ConfigError> {
        let record: ScenarioRecord = serde_json::from_str(json)?;
        Ok(record.into())
    }

    /// Load a scenario from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Scenario::from_json_str(&contents)
    }

    /// Run the thermodynamic engine on this scenario.
    pub fn analyze(&self) -> Result<FoehnAnalysis> {
        compute_fohn_profile_with(
            self.surface_pressure,
            self.surface_temperature,
            self.surface_dew_point,
            self.summit_pressure,
            &self.options,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    #[serde(default = "default_name")]
    name: String,
    surface_pressure: f64,
    surface_temperature: f64,
    surface_dew_point: f64,
    summit_pressure: f64,
    #[serde(default)]
    options: OptionsRecord,
}

fn default_name() -> String {
    "Custom".to_owned()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsRecord {
    precipitation_efficiency: Option<f64>,
    integration_step: Option<f64>,
    sample_interval: Option<f64>,
    pressure_tolerance: Option<f64>,
    max_iterations: Option<usize>,
    leeward_surface_pressure: Option<f64>,
}

impl From<OptionsRecord> for PathOptions {
    fn from(rec: OptionsRecord) -> Self {
        let defaults = PathOptions::default();

        PathOptions {
            precipitation_efficiency: rec
                .precipitation_efficiency
                .unwrap_or(defaults.precipitation_efficiency),
            integration_step: rec.integration_step.unwrap_or(defaults.integration_step),
            sample_interval: rec.sample_interval.unwrap_or(defaults.sample_interval),
            pressure_tolerance: rec
                .pressure_tolerance
                .unwrap_or(defaults.pressure_tolerance),
            max_iterations: rec.max_iterations.unwrap_or(defaults.max_iterations),
            leeward_surface_pressure: rec
                .leeward_surface_pressure
                .map(|p| some(HectoPascal(p)))
                .unwrap_or(defaults.leeward_surface_pressure),
        }
    }
}

impl From<ScenarioRecord> for Scenario {
    fn from(rec: ScenarioRecord) -> Self {
        Scenario {
            name: rec.name,
            surface_pressure: HectoPascal(rec.surface_pressure),
            surface_temperature: Celsius(rec.surface_temperature),
            surface_dew_point: Celsius(rec.surface_dew_point),
            summit_pressure: HectoPascal(rec.summit_pressure),
            options: PathOptions::from(rec.options),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_options_valid() {
        assert!(PathOptions::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let opts = PathOptions::default();

        assert!(opts.with_precipitation_efficiency(1.5).validate().is_err());
        assert!(opts.with_precipitation_efficiency(-0.1).validate().is_err());
        assert!(opts
            .with_precipitation_efficiency(std::f64::NAN)
            .validate()
            .is_err());
        assert!(opts.with_integration_step(0.0).validate().is_err());
        assert!(opts.with_sample_interval(-10.0).validate().is_err());
        assert!(opts.with_root_finding(0.1, 0).validate().is_err());
        assert!(opts.with_root_finding(1.0e-300, std::usize::MAX).validate().is_err());
        assert!(opts.with_root_finding(0.0, 10).validate().is_err());
        assert!(opts
            .with_leeward_surface_pressure(HectoPascal(std::f64::INFINITY))
            .validate()
            .is_err());

        assert!(opts.with_precipitation_efficiency(0.0).validate().is_ok());
        assert!(opts.with_precipitation_efficiency(1.0).validate().is_ok());
    }

    #[test]
    fn test_tiny_steps_rejected() {
        let opts = PathOptions::default();

        assert!(opts
            .with_sample_interval(1.0e-12)
            .with_integration_step(1.0e-12)
            .validate()
            .is_err());
        assert!(opts.with_integration_step(1.0e-3).validate().is_err());
        assert!(opts.with_sample_interval(1.0e-3).validate().is_err());
        assert!(opts.with_sample_interval(std::f64::INFINITY).validate().is_err());

        assert!(opts
            .with_sample_interval(MIN_PRESSURE_STEP)
            .with_integration_step(MIN_PRESSURE_STEP)
            .with_root_finding(1.0e-6, MAX_ITERATIONS_LIMIT)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_tiny_steps_from_json_rejected() {
        let json = r#"{
            "surface_pressure": 1000.0,
            "surface_temperature": 20.0,
            "surface_dew_point": 10.5,
            "summit_pressure": 400.0,
            "options": { "sample_interval": 1e-12, "integration_step": 1e-12 }
        }"#;

        let scenario = Scenario::from_json_str(json).unwrap();
        assert!(matches!(
            scenario.analyze(),
            Err(AnalysisError::InvalidParcelState(_))
        ));
    }

    #[test]
    fn test_presets() {
        assert_eq!(Scenario::preset("madeira").unwrap(), Scenario::madeira());
        assert_eq!(Scenario::preset("Custom").unwrap(), Scenario::custom_preset());
        assert!(matches!(
            Scenario::preset("alps"),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "name": "Madeira",
            "surface_pressure": 1000.0,
            "surface_temperature": 20.0,
            "surface_dew_point": 10.5,
            "summit_pressure": 400.0,
            "options": { "precipitation_efficiency": 0.4, "leeward_surface_pressure": 1010.0 }
        }"#;

        let scenario = Scenario::from_json_str(json).unwrap();
        assert_eq!(scenario.name, "Madeira");
        assert_eq!(scenario.surface_pressure, HectoPascal(1000.0));
        assert_eq!(scenario.surface_dew_point, Celsius(10.5));
        assert_eq!(scenario.options.precipitation_efficiency, 0.4);
        assert_eq!(scenario.options.sample_interval, 10.0);
        assert_eq!(
            scenario.options.leeward_surface_pressure,
            some(HectoPascal(1010.0))
        );
    }

    #[test]
    fn test_scenario_from_json_defaults() {
        let json = r#"{
            "surface_pressure": 1013.0,
            "surface_temperature": 18.0,
            "surface_dew_point": 12.0,
            "summit_pressure": 500.0
        }"#;

        let scenario = Scenario::from_json_str(json).unwrap();
        assert_eq!(scenario.name, "Custom");
        assert_eq!(scenario.options, PathOptions::default());
    }

    #[test]
    fn test_scenario_from_bad_json() {
        assert!(matches!(
            Scenario::from_json_str(r#"{"surface_pressure": 1000.0}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Scenario::from_path("this/file/does/not/exist.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
