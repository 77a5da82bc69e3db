//! The state of an air parcel at one point along its path.
use crate::{
    error::{AnalysisError, Result},
    met_formulas,
};
use metfor::{self, Celsius, CelsiusDiff, HectoPascal, Kelvin, Quantity};

/// Variables defining a parcel as used in parcel analysis.
///
/// The mixing ratio is the total water carried by the parcel, vapour plus any suspended cloud
/// water. For an unsaturated parcel it is the same as the vapour mixing ratio implied by the dew
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parcel {
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Temperature in C
    pub temperature: Celsius,
    /// Dew point in C
    pub dew_point: Celsius,
    /// Total water mixing ratio in g/kg
    pub mixing_ratio: f64,
}

impl Parcel {
    /// Create an unsaturated (or just saturated) parcel from an observation. The mixing ratio is
    /// derived from the dew point.
    ///
    /// Fails if the pressure is not positive, any value is not finite, the dew point exceeds the
    /// temperature, or the dew point is outside the range of the vapour pressure curve.
    ///
    /// ```rust
    /// use foehn_analysis::Parcel;
    /// use metfor::{Celsius, HectoPascal};
    ///
    /// let pcl = Parcel::new(HectoPascal(1000.0), Celsius(20.0), Celsius(10.5)).unwrap();
    /// assert!((pcl.mixing_ratio - 8.0).abs() < 0.05);
    ///
    /// assert!(Parcel::new(HectoPascal(1000.0), Celsius(20.0), Celsius(21.0)).is_err());
    /// ```
    pub fn new(pressure: HectoPascal, temperature: Celsius, dew_point: Celsius) -> Result<Self> {
        check_finite(pressure.unpack(), "pressure")?;
        check_finite(temperature.unpack(), "temperature")?;
        check_finite(dew_point.unpack(), "dew point")?;

        if pressure <= HectoPascal(0.0) {
            return Err(AnalysisError::invalid(format!(
                "pressure must be positive, got {:.1} hPa",
                pressure.unpack()
            )));
        }

        if dew_point > temperature {
            return Err(AnalysisError::invalid(format!(
                "dew point {:.1}C exceeds temperature {:.1}C",
                dew_point.unpack(),
                temperature.unpack()
            )));
        }

        let mixing_ratio = metfor::mixing_ratio(dew_point, pressure)
            .map(met_formulas::to_grams_per_kg)
            .ok_or_else(|| {
                AnalysisError::invalid(format!(
                    "mixing ratio undefined for a {:.1}C dew point at {:.1} hPa",
                    dew_point.unpack(),
                    pressure.unpack()
                ))
            })?;

        Ok(Parcel {
            pressure,
            temperature,
            dew_point,
            mixing_ratio,
        })
    }

    /// A saturated parcel carrying `mixing_ratio` g/kg of total water.
    pub(crate) fn saturated(
        pressure: HectoPascal,
        temperature: Celsius,
        mixing_ratio: f64,
    ) -> Self {
        Parcel {
            pressure,
            temperature,
            dew_point: temperature,
            mixing_ratio,
        }
    }

    /// Get the potential temperature of the parcel.
    pub fn theta(&self) -> Kelvin {
        metfor::potential_temperature(self.pressure, self.temperature)
    }

    /// Get the vapour mixing ratio implied by the dew point, g/kg.
    pub fn vapor_mixing_ratio(&self) -> Option<f64> {
        metfor::mixing_ratio(self.dew_point, self.pressure).map(met_formulas::to_grams_per_kg)
    }

    /// Saturation mixing ratio at the parcel temperature and pressure, g/kg.
    pub fn saturation_mixing_ratio(&self) -> Option<f64> {
        metfor::mixing_ratio(self.temperature, self.pressure).map(met_formulas::to_grams_per_kg)
    }

    /// Relative humidity in percent, if the temperature is within the range of the vapour
    /// pressure curve.
    pub fn relative_humidity(&self) -> Option<f64> {
        metfor::rh(self.temperature, self.dew_point).map(|rh| 100.0 * rh)
    }

    /// Temperature minus dew point.
    pub fn dew_point_depression(&self) -> CelsiusDiff {
        self.temperature - self.dew_point
    }

    /// Whether the dew point is within `tolerance` of the temperature.
    pub fn is_saturated(&self, tolerance: f64) -> bool {
        self.dew_point_depression().unpack().abs() <= tolerance
    }
}

fn check_finite(val: f64, name: &str) -> Result<()> {
    if val.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::invalid(format!("{} is not finite", name)))
    }
}
