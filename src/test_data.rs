//! Data used in tests.
use crate::foehn::{compute_fohn_profile, FoehnAnalysis};
use metfor::{Celsius, HectoPascal};

pub const MADEIRA_SURFACE_PRESSURE: f64 = 1000.0;
pub const MADEIRA_SURFACE_TEMPERATURE: f64 = 20.0;
pub const MADEIRA_SURFACE_DEW_POINT: f64 = 10.5;
pub const MADEIRA_SUMMIT_PRESSURE: f64 = 400.0;

// Values observed on the Madeira case day.
pub const REF_LCL_PRESSURE: f64 = 870.0;
pub const REF_LCL_TEMPERATURE: f64 = 8.4;
pub const REF_SUMMIT_TEMPERATURE: f64 = -32.0;
pub const REF_LEEWARD_LCL_PRESSURE: f64 = 655.0;
pub const REF_LEEWARD_LCL_TEMPERATURE: f64 = -4.5;
pub const REF_LEEWARD_TEMPERATURE: f64 = 30.0;
pub const REF_LEEWARD_DEW_POINT: f64 = 1.4;
pub const REF_LEEWARD_RH: f64 = 16.0;

pub fn madeira_analysis() -> FoehnAnalysis {
    compute_fohn_profile(
        HectoPascal(MADEIRA_SURFACE_PRESSURE),
        Celsius(MADEIRA_SURFACE_TEMPERATURE),
        Celsius(MADEIRA_SURFACE_DEW_POINT),
        HectoPascal(MADEIRA_SUMMIT_PRESSURE),
    )
    .expect("reference case failed")
}
