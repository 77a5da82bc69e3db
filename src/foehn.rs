//! Trace a parcel over a mountain range.
//!
//! The parcel starts at the windward surface, rises dry adiabatically to its lifting
//! condensation level (LCL), continues moist adiabatically to the summit while part of its
//! condensate rains out, then sinks moist adiabatically until the remaining cloud water has
//! evaporated (the leeward LCL) and dry adiabatically from there to the leeward surface. Because
//! the water that fell as precipitation is gone, the leeward cloud base is higher than the
//! windward one and the parcel arrives warmer and drier than it started: the Foehn effect.
use crate::{
    config::PathOptions,
    error::{AnalysisError, Result},
    keys::{KeyPoint, Stage},
    met_formulas,
    parcel::Parcel,
};
use itertools::Itertools;
use metfor::{Celsius, HectoPascal, Quantity};
use strum::IntoEnumIterator;

mod lcl;

/// The samples of one stage of the path, ordered along the path.
///
/// Pressure decreases monotonically through the samples of an ascending stage and increases
/// through those of a descending stage. There is always at least one sample; a stage that does
/// not happen, such as the dry ascent of an already saturated parcel, has exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelPathSegment {
    stage: Stage,
    samples: Vec<Parcel>,
}

impl ParcelPathSegment {
    /// Which stage this is.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The samples in path order.
    #[inline]
    pub fn samples(&self) -> &[Parcel] {
        &self.samples
    }

    /// The state at the start of the stage.
    #[inline]
    pub fn first(&self) -> &Parcel {
        &self.samples[0]
    }

    /// The state at the end of the stage.
    #[inline]
    pub fn last(&self) -> &Parcel {
        &self.samples[self.samples.len() - 1]
    }

    /// True if the stage has zero length.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.samples.len() == 1
    }
}

/// The full path, the four stages in order.
///
/// Adjacent stages share their boundary state, the last sample of one stage is identical to the
/// first sample of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelPath {
    segments: [ParcelPathSegment; 4],
}

impl ParcelPath {
    /// The stages in path order.
    #[inline]
    pub fn segments(&self) -> &[ParcelPathSegment] {
        &self.segments
    }

    /// Get a single stage.
    #[inline]
    pub fn segment(&self, stage: Stage) -> &ParcelPathSegment {
        &self.segments[stage as usize]
    }

    /// Every sample along the path with the shared boundary states listed once.
    pub fn samples(&self) -> impl Iterator<Item = &Parcel> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, seg)| seg.samples.iter().skip(if i == 0 { 0 } else { 1 }))
    }

    /// Number of distinct samples along the path.
    pub fn len(&self) -> usize {
        self.samples().count()
    }

    /// Never true, a path always has at least its start point.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The result of tracing a parcel over a mountain.
#[derive(Debug, Clone, PartialEq)]
pub struct FoehnAnalysis {
    path: ParcelPath,
    options: PathOptions,
    leeward_relative_humidity: f64,
}

impl FoehnAnalysis {
    /// Retrieve the parcel path.
    #[inline]
    pub fn path(&self) -> &ParcelPath {
        &self.path
    }

    /// The options the path was computed with.
    #[inline]
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Get the parcel state at a key point.
    pub fn key_point(&self, key: KeyPoint) -> &Parcel {
        match key {
            KeyPoint::WindwardSurface => self.path.segment(Stage::DryAscent).first(),
            KeyPoint::WindwardLCL => self.path.segment(Stage::DryAscent).last(),
            KeyPoint::Summit => self.path.segment(Stage::MoistAscent).last(),
            KeyPoint::LeewardLCL => self.path.segment(Stage::MoistDescent).last(),
            KeyPoint::LeewardSurface => self.path.segment(Stage::DryDescent).last(),
        }
    }

    /// All the key points in path order.
    pub fn key_points(&self) -> impl Iterator<Item = (KeyPoint, &Parcel)> {
        KeyPoint::iter().map(move |key| (key, self.key_point(key)))
    }

    /// The starting state on the windward coast.
    pub fn windward_surface(&self) -> &Parcel {
        self.key_point(KeyPoint::WindwardSurface)
    }

    /// Cloud base on the windward slope.
    pub fn windward_lcl(&self) -> &Parcel {
        self.key_point(KeyPoint::WindwardLCL)
    }

    /// The state at the mountain top, always saturated.
    pub fn summit(&self) -> &Parcel {
        self.key_point(KeyPoint::Summit)
    }

    /// Cloud base on the leeward slope.
    pub fn leeward_lcl(&self) -> &Parcel {
        self.key_point(KeyPoint::LeewardLCL)
    }

    /// The final state on the leeward coast.
    pub fn leeward_surface(&self) -> &Parcel {
        self.key_point(KeyPoint::LeewardSurface)
    }

    /// Relative humidity on the leeward coast in percent.
    #[inline]
    pub fn leeward_relative_humidity(&self) -> f64 {
        self.leeward_relative_humidity
    }
}

/// Trace a parcel over a mountain using the default [`PathOptions`].
///
/// # Arguments
/// surface_pressure, surface_temperature, surface_dew_point: The windward surface observation.
///
/// summit_pressure: The pressure at the mountain top. Must be lower than the surface pressure.
///
/// # Examples
///
/// ```rust
/// use foehn_analysis::compute_fohn_profile;
/// use metfor::{Celsius, HectoPascal, Quantity};
///
/// let anal = compute_fohn_profile(
///     HectoPascal(1000.0),
///     Celsius(20.0),
///     Celsius(10.5),
///     HectoPascal(400.0),
/// )
/// .unwrap();
///
/// // Warmer and much drier on the lee side.
/// assert!(anal.leeward_surface().temperature > Celsius(29.0));
/// assert!(anal.leeward_relative_humidity() < 20.0);
/// ```
pub fn compute_fohn_profile(
    surface_pressure: HectoPascal,
    surface_temperature: Celsius,
    surface_dew_point: Celsius,
    summit_pressure: HectoPascal,
) -> Result<FoehnAnalysis> {
    compute_fohn_profile_with(
        surface_pressure,
        surface_temperature,
        surface_dew_point,
        summit_pressure,
        &PathOptions::default(),
    )
}

/// Trace a parcel over a mountain.
///
/// Fails with [`AnalysisError::InvalidParcelState`] if the inputs or options are not physically
/// valid, and with [`AnalysisError::Convergence`] if a condensation level search runs out of
/// iterations. No partial path is ever returned.
pub fn compute_fohn_profile_with(
    surface_pressure: HectoPascal,
    surface_temperature: Celsius,
    surface_dew_point: Celsius,
    summit_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<FoehnAnalysis> {
    options.validate()?;

    let surface = Parcel::new(surface_pressure, surface_temperature, surface_dew_point)?;

    if !summit_pressure.unpack().is_finite() || summit_pressure <= HectoPascal(0.0) {
        return Err(AnalysisError::invalid(format!(
            "summit pressure must be positive, got {:.1} hPa",
            summit_pressure.unpack()
        )));
    }

    if summit_pressure >= surface_pressure {
        return Err(AnalysisError::invalid(format!(
            "summit pressure {:.1} hPa must be below the surface pressure {:.1} hPa",
            summit_pressure.unpack(),
            surface_pressure.unpack()
        )));
    }

    let leeward_surface_pressure = options
        .leeward_surface_pressure
        .into_option()
        .unwrap_or(surface_pressure);

    if leeward_surface_pressure <= summit_pressure {
        return Err(AnalysisError::invalid(format!(
            "leeward surface pressure {:.1} hPa must be above the summit pressure {:.1} hPa",
            leeward_surface_pressure.unpack(),
            summit_pressure.unpack()
        )));
    }

    let dry_ascent = dry_ascent(&surface, summit_pressure, options)?;
    let moist_ascent = moist_ascent(dry_ascent.last(), summit_pressure, options)?;
    let moist_descent = moist_descent(moist_ascent.last(), leeward_surface_pressure, options)?;
    let dry_descent = dry_descent(moist_descent.last(), leeward_surface_pressure, options)?;

    let path = ParcelPath {
        segments: [dry_ascent, moist_ascent, moist_descent, dry_descent],
    };

    let leeward = path.segment(Stage::DryDescent).last();
    let leeward_relative_humidity = leeward.relative_humidity().ok_or_else(|| {
        AnalysisError::invalid(format!(
            "relative humidity undefined at {:.1}C on the leeward surface",
            leeward.temperature.unpack()
        ))
    })?;

    let anal = FoehnAnalysis {
        path,
        options: *options,
        leeward_relative_humidity,
    };

    log::debug!(
        "summit {:.1}C, leeward surface {:.1}C / {:.1}C, RH {:.1}%",
        anal.summit().temperature.unpack(),
        anal.leeward_surface().temperature.unpack(),
        anal.leeward_surface().dew_point.unpack(),
        anal.leeward_relative_humidity()
    );

    Ok(anal)
}

fn dry_ascent(
    surface: &Parcel,
    summit_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<ParcelPathSegment> {
    let lcl = lcl::windward_lcl(surface, summit_pressure, options)?;

    Ok(ParcelPathSegment {
        stage: Stage::DryAscent,
        samples: dry_samples(surface, &lcl, options)?,
    })
}

fn moist_ascent(
    lcl: &Parcel,
    summit_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<ParcelPathSegment> {
    let surface_mw = lcl.mixing_ratio;
    let efficiency = options.precipitation_efficiency;

    let samples = moist_samples(lcl, summit_pressure, options, |pressure, temperature| {
        let saturation_mw = metfor::mixing_ratio(temperature, pressure)
            .map(met_formulas::to_grams_per_kg)
            .ok_or_else(|| undefined_mixing_ratio(pressure))?;

        Ok(total_water(surface_mw, saturation_mw, efficiency))
    })?;

    Ok(ParcelPathSegment {
        stage: Stage::MoistAscent,
        samples,
    })
}

fn moist_descent(
    summit: &Parcel,
    leeward_surface_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<ParcelPathSegment> {
    let lcl_pressure = lcl::leeward_lcl_pressure(summit, leeward_surface_pressure, options)?;

    let samples = moist_samples(summit, lcl_pressure, options, |_, _| Ok(summit.mixing_ratio))?;

    Ok(ParcelPathSegment {
        stage: Stage::MoistDescent,
        samples,
    })
}

fn dry_descent(
    lcl: &Parcel,
    leeward_surface_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<ParcelPathSegment> {
    let end = if lcl.pressure == leeward_surface_pressure {
        *lcl
    } else {
        dry_adiabatic_state(lcl, leeward_surface_pressure)?
    };

    Ok(ParcelPathSegment {
        stage: Stage::DryDescent,
        samples: dry_samples(lcl, &end, options)?,
    })
}

/// Total water left after the moist ascent has reached a saturation mixing ratio of
/// `saturation_mw`. The fraction `efficiency` of everything condensed so far has rained out.
#[inline]
fn total_water(surface_mw: f64, saturation_mw: f64, efficiency: f64) -> f64 {
    if saturation_mw >= surface_mw {
        surface_mw
    } else {
        surface_mw - efficiency * (surface_mw - saturation_mw)
    }
}

/// Move `start` dry adiabatically to `pressure`, conserving its mixing ratio.
fn dry_adiabatic_state(start: &Parcel, pressure: HectoPascal) -> Result<Parcel> {
    let temperature =
        met_formulas::dry_adiabat_temperature(start.pressure, start.temperature, pressure);

    let dew_point = Some(met_formulas::from_grams_per_kg(start.mixing_ratio))
        .filter(|&mw| mw > 0.0)
        .and_then(|mw| metfor::dew_point_from_p_and_mw(pressure, mw))
        .ok_or_else(|| undefined_mixing_ratio(pressure))?;

    // The dew point trace only touches the temperature trace at a condensation level.
    let dew_point = if dew_point > temperature {
        temperature
    } else {
        dew_point
    };

    Ok(Parcel {
        pressure,
        temperature,
        dew_point,
        mixing_ratio: start.mixing_ratio,
    })
}

fn dry_samples(start: &Parcel, end: &Parcel, options: &PathOptions) -> Result<Vec<Parcel>> {
    let levels = pressure_levels(start.pressure, end.pressure, options.sample_interval);
    let last = levels.len() - 1;

    levels
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                Ok(*start)
            } else if i == last {
                Ok(*end)
            } else {
                dry_adiabatic_state(start, p)
            }
        })
        .collect()
}

fn moist_samples<F>(
    start: &Parcel,
    end_pressure: HectoPascal,
    options: &PathOptions,
    mixing_ratio: F,
) -> Result<Vec<Parcel>>
where
    F: Fn(HectoPascal, Celsius) -> Result<f64>,
{
    let levels = pressure_levels(start.pressure, end_pressure, options.sample_interval);

    let mut samples = Vec::with_capacity(levels.len());
    samples.push(*start);

    let mut temperature = start.temperature;
    for (p0, p1) in levels.into_iter().tuple_windows::<(_, _)>() {
        temperature = met_formulas::moist_adiabat(p0, temperature, p1, options.integration_step)
            .ok_or_else(|| undefined_mixing_ratio(p1))?;

        let mw = mixing_ratio(p1, temperature)?;
        samples.push(Parcel::saturated(p1, temperature, mw));
    }

    Ok(samples)
}

/// Evenly spaced pressure levels from `start` to `end` inclusive, no further apart than
/// `interval`.
fn pressure_levels(start: HectoPascal, end: HectoPascal, interval: f64) -> Vec<HectoPascal> {
    let p0 = start.unpack();
    let delta = end.unpack() - p0;

    if delta == 0.0 {
        return vec![start];
    }

    let steps = (delta.abs() / interval).ceil().max(1.0) as usize;

    (0..=steps)
        .map(|i| {
            if i == steps {
                end
            } else {
                HectoPascal(p0 + delta * i as f64 / steps as f64)
            }
        })
        .collect()
}

fn undefined_mixing_ratio(pressure: HectoPascal) -> AnalysisError {
    AnalysisError::invalid(format!(
        "mixing ratio undefined at {:.1} hPa",
        pressure.unpack()
    ))
}
