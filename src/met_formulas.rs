//! Meteorological formulas used to trace a parcel.
//!
//! Moisture relations come from `metfor`. Dry adiabats go through potential temperature, and the
//! moist adiabat is integrated numerically, see [`moist_adiabat`].
use crate::constants::{G_PER_KG, LV};
use metfor::{cpd, epsilon, Celsius, HectoPascal, Kelvin, Quantity, Rd};

/// Most sub-steps [`moist_adiabat`] will take for one call.
const MAX_INTEGRATION_STEPS: f64 = 1.0e6;

/// Convert a mixing ratio in kg/kg to g/kg.
#[inline]
pub fn to_grams_per_kg(mw: f64) -> f64 {
    mw * G_PER_KG
}

/// Convert a mixing ratio in g/kg to kg/kg.
#[inline]
pub fn from_grams_per_kg(mw: f64) -> f64 {
    mw / G_PER_KG
}

/// Temperature at `pressure` of a parcel moved dry adiabatically from the given start level.
#[inline]
pub fn dry_adiabat_temperature(
    start_pressure: HectoPascal,
    start_temperature: Celsius,
    pressure: HectoPascal,
) -> Celsius {
    let theta = metfor::potential_temperature(start_pressure, start_temperature);
    Celsius::from(metfor::temperature_from_pot_temp(theta, pressure))
}

/// Rate of change of temperature with pressure, K/hPa, for a saturated parcel following a
/// pseudo-adiabat.
///
/// ```text
///              Rd T + Lv rs
/// dT/dp = -------------------------
///          p (cpd + Lv² rs ε / (Rd T²))
/// ```
///
/// where `rs` is the saturation mixing ratio at (p, T) and T is in Kelvin. Returns `None` where
/// the saturation mixing ratio is undefined.
#[inline]
pub fn moist_lapse_rate(pressure: HectoPascal, temperature: Celsius) -> Option<f64> {
    let rs = metfor::mixing_ratio(temperature, pressure)?;
    let t_k = Kelvin::from(temperature).unpack();
    let p = pressure.unpack();
    let (rd, cp) = (Rd.unpack(), cpd.unpack());

    let numerator = rd * t_k + LV * rs;
    let denominator = p * (cp + LV * LV * rs * epsilon / (rd * t_k * t_k));

    Some(numerator / denominator)
}

/// Follow the moist adiabat through (`start_pressure`, `start_temperature`) to `end_pressure`.
///
/// The interval is split into the fewest equal sub-steps no larger than `max_step` and each is
/// integrated with the classical fourth order Runge-Kutta scheme applied to
/// [`moist_lapse_rate`]. Works in either direction. Returns `None` if `max_step` is not positive,
/// if it would take more than a million sub-steps, or if the lapse rate is undefined somewhere
/// along the way.
pub fn moist_adiabat(
    start_pressure: HectoPascal,
    start_temperature: Celsius,
    end_pressure: HectoPascal,
    max_step: f64,
) -> Option<Celsius> {
    if !(max_step > 0.0) {
        return None;
    }

    let p0 = start_pressure.unpack();
    let delta = end_pressure.unpack() - p0;
    let steps = (delta.abs() / max_step).ceil().max(1.0);
    if !(steps <= MAX_INTEGRATION_STEPS) {
        return None;
    }

    let steps = steps as usize;
    let h = delta / steps as f64;

    let slope = |p: f64, t: f64| moist_lapse_rate(HectoPascal(p), Celsius(t));

    let mut t = start_temperature.unpack();
    for i in 0..steps {
        let p = p0 + h * i as f64;

        let k1 = slope(p, t)?;
        let k2 = slope(p + h / 2.0, t + h * k1 / 2.0)?;
        let k3 = slope(p + h / 2.0, t + h * k2 / 2.0)?;
        let k4 = slope(p + h, t + h * k3)?;

        t += h * (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0;
    }

    Some(Celsius(t))
}
