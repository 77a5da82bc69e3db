//! Condensation level searches on either side of the mountain.
use crate::{
    config::PathOptions,
    error::{AnalysisError, Result},
    met_formulas,
    parcel::Parcel,
    utility::find_root,
};
use metfor::{HectoPascal, Quantity};

/// Find the windward cloud base by lifting `surface` dry adiabatically until its dew point, from
/// the conserved mixing ratio, meets its temperature.
///
/// The search is confined to the layer between the summit and the surface. A parcel that is
/// already saturated has its cloud base at the surface, and a parcel that would stay unsaturated
/// all the way to the summit is rejected.
pub(super) fn windward_lcl(
    surface: &Parcel,
    summit_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<Parcel> {
    if surface.dew_point >= surface.temperature {
        return Ok(Parcel::saturated(
            surface.pressure,
            surface.temperature,
            surface.mixing_ratio,
        ));
    }

    let mw = met_formulas::from_grams_per_kg(surface.mixing_ratio);

    let depression = |p: f64| -> f64 {
        let p = HectoPascal(p);
        let t = met_formulas::dry_adiabat_temperature(surface.pressure, surface.temperature, p);

        metfor::dew_point_from_p_and_mw(p, mw)
            .map(|dp| (t - dp).unpack())
            .unwrap_or(std::f64::NAN)
    };

    let at_summit = depression(summit_pressure.unpack());
    if at_summit > 0.0 {
        return Err(AnalysisError::invalid(format!(
            "parcel is still {:.1}C from saturation at the summit ({:.1} hPa)",
            at_summit,
            summit_pressure.unpack()
        )));
    }

    let pressure = find_root(
        depression,
        summit_pressure.unpack(),
        surface.pressure.unpack(),
        options.pressure_tolerance,
        options.max_iterations,
    )
    .map(HectoPascal)?;

    let temperature =
        met_formulas::dry_adiabat_temperature(surface.pressure, surface.temperature, pressure);

    log::debug!(
        "windward LCL at {:.1} hPa, {:.2}C",
        pressure.unpack(),
        temperature.unpack()
    );

    Ok(Parcel::saturated(pressure, temperature, surface.mixing_ratio))
}

/// Find the leeward cloud base, the pressure where a parcel sinking moist adiabatically from the
/// summit has evaporated all the water it still carries.
///
/// If the parcel is still saturated at the leeward surface the surface pressure is returned and
/// the dry descent has zero length.
pub(super) fn leeward_lcl_pressure(
    summit: &Parcel,
    leeward_surface_pressure: HectoPascal,
    options: &PathOptions,
) -> Result<HectoPascal> {
    let total_water = met_formulas::from_grams_per_kg(summit.mixing_ratio);
    let step = options.integration_step;

    let excess = |p: f64| -> f64 {
        let p = HectoPascal(p);

        met_formulas::moist_adiabat(summit.pressure, summit.temperature, p, step)
            .and_then(|t| metfor::mixing_ratio(t, p))
            .map(|ws| ws - total_water)
            .unwrap_or(std::f64::NAN)
    };

    if excess(summit.pressure.unpack()) >= 0.0 {
        log::debug!("all cloud water gone at the summit");
        return Ok(summit.pressure);
    }

    if excess(leeward_surface_pressure.unpack()) <= 0.0 {
        log::debug!(
            "parcel still saturated at the leeward surface ({:.1} hPa)",
            leeward_surface_pressure.unpack()
        );
        return Ok(leeward_surface_pressure);
    }

    let pressure = find_root(
        excess,
        summit.pressure.unpack(),
        leeward_surface_pressure.unpack(),
        options.pressure_tolerance,
        options.max_iterations,
    )
    .map(HectoPascal)?;

    log::debug!("leeward LCL at {:.1} hPa", pressure.unpack());

    Ok(pressure)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;
    use metfor::Celsius;

    #[test]
    fn test_windward_lcl() {
        let sfc = Parcel::new(HectoPascal(1000.0), Celsius(20.0), Celsius(10.5)).unwrap();
        let lcl = windward_lcl(&sfc, HectoPascal(400.0), &PathOptions::default()).unwrap();

        assert!(approx_equal(lcl.pressure.unpack(), 868.0, 5.0));
        assert!(approx_equal(lcl.temperature.unpack(), 8.4, 0.5));
        assert_eq!(lcl.mixing_ratio, sfc.mixing_ratio);
        assert!(lcl.is_saturated(0.0));
    }

    #[test]
    fn test_windward_lcl_saturated_surface() {
        let sfc = Parcel::new(HectoPascal(1000.0), Celsius(15.0), Celsius(15.0)).unwrap();
        let lcl = windward_lcl(&sfc, HectoPascal(500.0), &PathOptions::default()).unwrap();

        assert_eq!(lcl, sfc);
    }

    #[test]
    fn test_windward_lcl_above_summit() {
        let sfc = Parcel::new(HectoPascal(1000.0), Celsius(30.0), Celsius(-10.0)).unwrap();
        let res = windward_lcl(&sfc, HectoPascal(900.0), &PathOptions::default());

        assert!(matches!(res, Err(AnalysisError::InvalidParcelState(_))));
    }

    #[test]
    fn test_windward_lcl_iteration_limit() {
        let sfc = Parcel::new(HectoPascal(1000.0), Celsius(20.0), Celsius(10.5)).unwrap();
        let opts = PathOptions::default().with_root_finding(1.0e-9, 3);
        let res = windward_lcl(&sfc, HectoPascal(400.0), &opts);

        assert!(matches!(
            res,
            Err(AnalysisError::Convergence { iterations: 3, .. })
        ));
    }

    #[test]
    fn test_leeward_lcl_pressure() {
        let opts = PathOptions::default();

        // Saturated at 400 hPa, -31 C with a bit of cloud water left over.
        let ws = metfor::mixing_ratio(Celsius(-31.0), HectoPascal(400.0)).unwrap();
        let summit = Parcel::saturated(
            HectoPascal(400.0),
            Celsius(-31.0),
            met_formulas::to_grams_per_kg(ws) + 1.0,
        );

        let p = leeward_lcl_pressure(&summit, HectoPascal(1000.0), &opts).unwrap();
        assert!(p > HectoPascal(400.0));
        assert!(p < HectoPascal(1000.0));

        let t = met_formulas::moist_adiabat(summit.pressure, summit.temperature, p, 1.0).unwrap();
        let ws = met_formulas::to_grams_per_kg(metfor::mixing_ratio(t, p).unwrap());
        assert!(approx_equal(ws, summit.mixing_ratio, 0.01));
    }

    #[test]
    fn test_leeward_lcl_at_summit() {
        let ws = metfor::mixing_ratio(Celsius(-31.0), HectoPascal(400.0)).unwrap();
        let summit = Parcel::saturated(
            HectoPascal(400.0),
            Celsius(-31.0),
            met_formulas::to_grams_per_kg(ws),
        );

        let p = leeward_lcl_pressure(&summit, HectoPascal(1000.0), &PathOptions::default())
            .unwrap();
        assert!(approx_equal(p.unpack(), 400.0, 0.2));
    }
}
