#![warn(missing_docs)]
//! Functions and data types for analyzing the Föhn effect, the warm dry wind on the lee side of a
//! mountain range.
//!
//! A surface parcel on the windward side is lifted over the mountain and brought back down the
//! other side. The path is traced through four stages (dry ascent to cloud base, moist ascent to
//! the summit, moist descent to the leeward cloud base, and dry descent to the leeward surface),
//! and the result can be rendered as a skew-T diagram, a key point table, and a text report.
//!
//! ```rust
//! use foehn_analysis::{compute_fohn_profile, FoehnMetrics, WarmingRisk};
//! use metfor::{Celsius, HectoPascal, Quantity};
//!
//! let anal = compute_fohn_profile(
//!     HectoPascal(1000.0),
//!     Celsius(20.0),
//!     Celsius(10.5),
//!     HectoPascal(400.0),
//! )
//! .unwrap();
//!
//! let lcl = anal.windward_lcl();
//! assert!((lcl.pressure.unpack() - 870.0).abs() < 5.0);
//!
//! let metrics = FoehnMetrics::new(&anal);
//! assert!(metrics.warming_risk >= WarmingRisk::Moderate);
//! ```

//
// API
//
pub use crate::{
    config::{PathOptions, Scenario},
    error::{AnalysisError, ConfigError, PresentationError, Result},
    foehn::{
        compute_fohn_profile, compute_fohn_profile_with, FoehnAnalysis, ParcelPath,
        ParcelPathSegment,
    },
    keys::{KeyPoint, Stage},
    metrics::{DrynessLevel, FoehnMetrics, WarmingRisk},
    observations::{Observations, SiteObservation},
    parcel::Parcel,
    present::{write_artifacts, ArtifactPaths},
};

pub mod constants;
pub mod met_formulas;
pub mod present;

//
// Internal use only
//

// Modules
mod config;
mod error;
mod foehn;
mod keys;
mod metrics;
mod observations;
mod parcel;
mod utility;

#[cfg(test)]
mod test_data;
