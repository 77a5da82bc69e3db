//! Enums used as keys for selecting parts of a parcel path.
use strum_macros::{Display, EnumIter};

/// The four stages of a parcel forced over a mountain, in path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Stage {
    /// Unsaturated ascent from the windward surface to cloud base.
    #[strum(to_string = "Dry Adiabatic Ascent")]
    DryAscent,
    /// Saturated ascent from cloud base to the summit, condensate partly precipitates.
    #[strum(to_string = "Saturated Adiabatic Ascent")]
    MoistAscent,
    /// Saturated descent from the summit to the leeward cloud base.
    #[strum(to_string = "Saturated Adiabatic Descent")]
    MoistDescent,
    /// Unsaturated descent from the leeward cloud base to the leeward surface.
    #[strum(to_string = "Dry Adiabatic Descent (Föhn)")]
    DryDescent,
}

impl Stage {
    /// Is the parcel rising (pressure decreasing) during this stage?
    pub fn is_ascent(self) -> bool {
        matches!(self, Stage::DryAscent | Stage::MoistAscent)
    }

    /// Is the parcel saturated during this stage?
    pub fn is_saturated(self) -> bool {
        matches!(self, Stage::MoistAscent | Stage::MoistDescent)
    }
}

/// Points of interest along the path, in path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum KeyPoint {
    /// Starting point on the windward coast.
    #[strum(to_string = "Windward surface")]
    WindwardSurface,
    /// Cloud base on the windward slope.
    #[strum(to_string = "LCL (ascent)")]
    WindwardLCL,
    /// Mountain top.
    #[strum(to_string = "Summit")]
    Summit,
    /// Cloud base on the leeward slope.
    #[strum(to_string = "LCL (descent)")]
    LeewardLCL,
    /// End point on the leeward coast.
    #[strum(to_string = "Leeward surface")]
    LeewardSurface,
}

impl KeyPoint {
    /// Short description of the weather at this point.
    pub fn conditions(self) -> &'static str {
        match self {
            KeyPoint::WindwardSurface => "Initial",
            KeyPoint::WindwardLCL => "Cloud base",
            KeyPoint::Summit => "Precipitation",
            KeyPoint::LeewardLCL => "Cloud base (descent)",
            KeyPoint::LeewardSurface => "Föhn (hot & dry)",
        }
    }
}
