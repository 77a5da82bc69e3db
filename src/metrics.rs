//! Summary measures of how strong a Föhn event is.
use crate::foehn::FoehnAnalysis;
use metfor::{CelsiusDiff, Quantity};
use strum_macros::Display;

/// How much the parcel warmed crossing the mountain, as a fire weather concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum WarmingRisk {
    /// Less than 5C of warming.
    #[strum(to_string = "LOW")]
    Low,
    /// More than 5C.
    #[strum(to_string = "MODERATE")]
    Moderate,
    /// More than 10C.
    #[strum(to_string = "HIGH")]
    High,
    /// More than 15C.
    #[strum(to_string = "EXTREME")]
    Extreme,
}

impl WarmingRisk {
    /// Classify a temperature increase.
    pub fn from_temperature_increase(increase: CelsiusDiff) -> Self {
        let increase = increase.unpack();

        if increase > 15.0 {
            WarmingRisk::Extreme
        } else if increase > 10.0 {
            WarmingRisk::High
        } else if increase > 5.0 {
            WarmingRisk::Moderate
        } else {
            WarmingRisk::Low
        }
    }
}

/// How dry the air reaching the leeward coast is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DrynessLevel {
    /// Relative humidity of 30% or more.
    #[strum(to_string = "NORMAL")]
    Normal,
    /// Relative humidity below 30%.
    #[strum(to_string = "VERY DRY")]
    VeryDry,
    /// Relative humidity below 20%.
    #[strum(to_string = "EXTREMELY DRY")]
    ExtremelyDry,
}

impl DrynessLevel {
    /// Classify a relative humidity in percent.
    pub fn from_relative_humidity(rh: f64) -> Self {
        if rh < 20.0 {
            DrynessLevel::ExtremelyDry
        } else if rh < 30.0 {
            DrynessLevel::VeryDry
        } else {
            DrynessLevel::Normal
        }
    }
}

/// Warming and drying between the windward and leeward surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoehnMetrics {
    /// Leeward minus windward surface temperature.
    pub temperature_increase: CelsiusDiff,
    /// Water lost to precipitation, g/kg.
    pub moisture_loss: f64,
    /// Water lost as a percentage of what the parcel started with.
    pub moisture_loss_percent: f64,
    /// Relative humidity at the leeward surface in percent.
    pub leeward_relative_humidity: f64,
    /// Warming classification.
    pub warming_risk: WarmingRisk,
    /// Dryness classification.
    pub dryness: DrynessLevel,
}

impl FoehnMetrics {
    /// Calculate the metrics for an analysis.
    pub fn new(anal: &FoehnAnalysis) -> Self {
        let windward = anal.windward_surface();
        let leeward = anal.leeward_surface();

        let temperature_increase = leeward.temperature - windward.temperature;
        let moisture_loss = windward.mixing_ratio - leeward.mixing_ratio;
        let moisture_loss_percent = if windward.mixing_ratio > 0.0 {
            100.0 * moisture_loss / windward.mixing_ratio
        } else {
            0.0
        };
        let leeward_relative_humidity = anal.leeward_relative_humidity();

        FoehnMetrics {
            temperature_increase,
            moisture_loss,
            moisture_loss_percent,
            leeward_relative_humidity,
            warming_risk: WarmingRisk::from_temperature_increase(temperature_increase),
            dryness: DrynessLevel::from_relative_humidity(leeward_relative_humidity),
        }
    }

    /// One sentence describing the fire weather implications.
    pub fn interpretation(&self) -> &'static str {
        match (self.warming_risk, self.dryness) {
            (WarmingRisk::Extreme, _) | (WarmingRisk::High, DrynessLevel::ExtremelyDry) => {
                "Critical fire weather: hot, very dry downslope winds on the lee side."
            }
            (WarmingRisk::High, _) | (_, DrynessLevel::ExtremelyDry) => {
                "Elevated fire danger on the lee side."
            }
            (WarmingRisk::Moderate, _) | (_, DrynessLevel::VeryDry) => {
                "Noticeable Föhn warming and drying on the lee side."
            }
            (WarmingRisk::Low, DrynessLevel::Normal) => "Weak or no Föhn effect.",
        }
    }
}
