//! Key point summary table.
use crate::{error::PresentationError, foehn::FoehnAnalysis, keys::KeyPoint};
use metfor::Quantity;
use serde::Serialize;
use std::fmt::Write;

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPointRow {
    /// Which point this row describes.
    #[serde(skip)]
    pub key: KeyPoint,
    /// Label for display.
    #[serde(rename = "Point")]
    pub label: String,
    /// Pressure in hPa.
    #[serde(rename = "Pressure (hPa)")]
    pub pressure: f64,
    /// Temperature in C.
    #[serde(rename = "Temperature (C)")]
    pub temperature: f64,
    /// Dew point in C.
    #[serde(rename = "Dew Point (C)")]
    pub dew_point: f64,
    /// Vapour mixing ratio in g/kg.
    #[serde(rename = "Mixing Ratio (g/kg)")]
    pub mixing_ratio: f64,
    /// Relative humidity in percent, missing outside the range of the vapour pressure curve.
    #[serde(rename = "RH (%)")]
    pub relative_humidity: Option<f64>,
    /// Short description of the weather at this point.
    #[serde(rename = "Conditions")]
    pub conditions: String,
}

/// Build the table rows, in path order.
pub fn key_point_rows(anal: &FoehnAnalysis) -> Vec<KeyPointRow> {
    anal.key_points()
        .map(|(key, pcl)| KeyPointRow {
            key,
            label: key.to_string(),
            pressure: round_to(pcl.pressure.unpack(), 1),
            temperature: round_to(pcl.temperature.unpack(), 2),
            dew_point: round_to(pcl.dew_point.unpack(), 2),
            mixing_ratio: round_to(pcl.vapor_mixing_ratio().unwrap_or(pcl.mixing_ratio), 2),
            relative_humidity: pcl.relative_humidity().map(|rh| round_to(rh, 1)),
            conditions: key.conditions().to_owned(),
        })
        .collect()
}

/// Format the rows as a fixed width text table.
pub fn format_table(rows: &[KeyPointRow]) -> Result<String, PresentationError> {
    let mut out = String::new();

    writeln!(
        out,
        "{:<18} {:>9} {:>9} {:>9} {:>9} {:>7}  {}",
        "Point", "P (hPa)", "T (C)", "Td (C)", "w (g/kg)", "RH (%)", "Conditions"
    )?;
    writeln!(out, "{}", "-".repeat(90))?;

    for row in rows {
        let rh = row
            .relative_humidity
            .map(|rh| format!("{:.1}", rh))
            .unwrap_or_else(|| "-".to_owned());

        writeln!(
            out,
            "{:<18} {:>9.1} {:>9.2} {:>9.2} {:>9.2} {:>7}  {}",
            row.label,
            row.pressure,
            row.temperature,
            row.dew_point,
            row.mixing_ratio,
            rh,
            row.conditions
        )?;
    }

    Ok(out)
}

/// Write the rows as CSV with a header line.
pub fn write_csv<W: std::io::Write>(
    rows: &[KeyPointRow],
    writer: W,
) -> Result<(), PresentationError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(csv::Error::from)?;

    Ok(())
}

fn round_to(val: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (val * scale).round() / scale
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::*;

    #[test]
    fn test_key_point_rows() {
        let rows = key_point_rows(&madeira_analysis());

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].key, KeyPoint::WindwardSurface);
        assert_eq!(rows[0].pressure, 1000.0);
        assert_eq!(rows[0].temperature, 20.0);
        assert_eq!(rows[2].label, "Summit");
        assert_eq!(rows[2].relative_humidity, Some(100.0));
        assert!(rows[4].relative_humidity.unwrap() < 20.0);
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&key_point_rows(&madeira_analysis())).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Point"));
        assert!(lines[2].starts_with("Windward surface"));
        assert!(lines[6].starts_with("Leeward surface"));
    }

    #[test]
    fn test_write_csv() {
        let mut buf: Vec<u8> = vec![];
        write_csv(&key_point_rows(&madeira_analysis()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "Point,Pressure (hPa),Temperature (C),Dew Point (C),Mixing Ratio (g/kg),RH (%),Conditions"
        );
        assert!(lines[1].starts_with("Windward surface,1000.0,20.0,"));
    }
}
