//! Constants used by the thermodynamic engine that `metfor` does not provide.

/// Latent heat of vaporization at 0C, J / kg.
pub const LV: f64 = 2.501e6;

/// Grams per kilogram, for converting mixing ratios.
pub const G_PER_KG: f64 = 1_000.0;
