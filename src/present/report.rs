//! Plain text analysis report.
use crate::{error::PresentationError, foehn::FoehnAnalysis, metrics::FoehnMetrics};
use chrono::NaiveDateTime;
use metfor::Quantity;
use std::fmt::Write;

/// Format a report of the inputs, the leeward results, and the Föhn metrics.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use foehn_analysis::{compute_fohn_profile, present::format_report};
/// use metfor::{Celsius, HectoPascal};
///
/// let anal = compute_fohn_profile(
///     HectoPascal(1000.0),
///     Celsius(20.0),
///     Celsius(10.5),
///     HectoPascal(400.0),
/// )
/// .unwrap();
///
/// let when = NaiveDate::from_ymd_opt(2024, 8, 14)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .unwrap();
///
/// let report = format_report(&anal, when).unwrap();
/// assert!(report.contains("Generated: 2024-08-14 12:00:00"));
/// ```
pub fn format_report(
    anal: &FoehnAnalysis,
    generated: NaiveDateTime,
) -> Result<String, PresentationError> {
    let windward = anal.windward_surface();
    let lcl = anal.windward_lcl();
    let summit = anal.summit();
    let lee_lcl = anal.leeward_lcl();
    let leeward = anal.leeward_surface();
    let metrics = FoehnMetrics::new(anal);

    let mut out = String::new();

    writeln!(out, "FÖHN EFFECT ANALYSIS")?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    writeln!(out, "Input parameters")?;
    writeln!(
        out,
        "  Surface pressure:          {:7.1} hPa",
        windward.pressure.unpack()
    )?;
    writeln!(
        out,
        "  Surface temperature:       {:7.1} C",
        windward.temperature.unpack()
    )?;
    writeln!(
        out,
        "  Surface dew point:         {:7.1} C",
        windward.dew_point.unpack()
    )?;
    writeln!(
        out,
        "  Summit pressure:           {:7.1} hPa",
        summit.pressure.unpack()
    )?;
    writeln!(
        out,
        "  Precipitation efficiency:  {:7.3}",
        anal.options().precipitation_efficiency
    )?;
    writeln!(out)?;

    writeln!(out, "Condensation levels")?;
    writeln!(
        out,
        "  Windward LCL:  {:6.1} hPa {:6.1} C",
        lcl.pressure.unpack(),
        lcl.temperature.unpack()
    )?;
    writeln!(
        out,
        "  Summit:        {:6.1} hPa {:6.1} C",
        summit.pressure.unpack(),
        summit.temperature.unpack()
    )?;
    writeln!(
        out,
        "  Leeward LCL:   {:6.1} hPa {:6.1} C",
        lee_lcl.pressure.unpack(),
        lee_lcl.temperature.unpack()
    )?;
    writeln!(out)?;

    writeln!(out, "Leeward surface")?;
    writeln!(
        out,
        "  Temperature:        {:6.1} C",
        leeward.temperature.unpack()
    )?;
    writeln!(out, "  Dew point:          {:6.1} C", leeward.dew_point.unpack())?;
    writeln!(out, "  Relative humidity:  {:6.1} %", metrics.leeward_relative_humidity)?;
    writeln!(out)?;

    writeln!(out, "Föhn metrics")?;
    writeln!(
        out,
        "  Temperature increase: {:+.1} C",
        metrics.temperature_increase.unpack()
    )?;
    writeln!(
        out,
        "  Moisture loss:        {:.2} g/kg ({:.0}%)",
        metrics.moisture_loss, metrics.moisture_loss_percent
    )?;
    writeln!(out, "  Warming risk:         {}", metrics.warming_risk)?;
    writeln!(out, "  Dryness:              {}", metrics.dryness)?;
    writeln!(out)?;
    writeln!(out, "{}", metrics.interpretation())?;

    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::*;
    use chrono::NaiveDate;

    #[test]
    fn test_report_sections() {
        let when = NaiveDate::from_ymd_opt(2024, 8, 14)
            .and_then(|d| d.and_hms_opt(6, 30, 0))
            .unwrap();
        let report = format_report(&madeira_analysis(), when).unwrap();

        assert!(report.starts_with("FÖHN EFFECT ANALYSIS\n"));
        assert!(report.contains("Generated: 2024-08-14 06:30:00"));
        assert!(report.contains("Summit pressure:             400.0 hPa"));
        assert!(report.contains("Dryness:              EXTREMELY DRY"));
        assert!(report.contains("Precipitation efficiency:    0.515"));
    }
}
