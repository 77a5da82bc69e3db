//! Turn a completed analysis into a diagram, a table, and a report.
//!
//! Nothing in here does any physics, it only formats what the engine produced.
use crate::{error::PresentationError, foehn::FoehnAnalysis};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

mod report;
mod skewt;
mod table;

pub use report::format_report;
pub use skewt::{render_skewt, SkewTLayout};
pub use table::{format_table, key_point_rows, write_csv, KeyPointRow};

/// File name of the diagram written by [`write_artifacts`].
pub const SKEWT_FILE_NAME: &str = "foehn_skewt.svg";
/// File name of the key point table written by [`write_artifacts`].
pub const TABLE_FILE_NAME: &str = "foehn_key_points.csv";
/// File name of the report written by [`write_artifacts`].
pub const REPORT_FILE_NAME: &str = "foehn_report.txt";

/// Title used on the diagram when none is given.
pub const DEFAULT_TITLE: &str = "Skew-T Log-P Diagram - Föhn Effect";

/// Where [`write_artifacts`] put its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The SVG diagram.
    pub skewt: PathBuf,
    /// The CSV table.
    pub table: PathBuf,
    /// The text report.
    pub report: PathBuf,
}

/// Write the diagram, table, and report into `out_dir`, creating it if needed.
pub fn write_artifacts<P: AsRef<Path>>(
    anal: &FoehnAnalysis,
    out_dir: P,
) -> Result<ArtifactPaths, PresentationError> {
    write_titled_artifacts(anal, out_dir, DEFAULT_TITLE)
}

/// Same as [`write_artifacts`] with a custom diagram title.
pub fn write_titled_artifacts<P: AsRef<Path>>(
    anal: &FoehnAnalysis,
    out_dir: P,
    title: &str,
) -> Result<ArtifactPaths, PresentationError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| PresentationError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let paths = ArtifactPaths {
        skewt: out_dir.join(SKEWT_FILE_NAME),
        table: out_dir.join(TABLE_FILE_NAME),
        report: out_dir.join(REPORT_FILE_NAME),
    };

    let svg = render_skewt(anal, title)?;
    write_file(&paths.skewt, svg.as_bytes())?;

    let csv_file = File::create(&paths.table).map_err(|source| PresentationError::Io {
        path: paths.table.clone(),
        source,
    })?;
    write_csv(&key_point_rows(anal), csv_file)?;

    let report = format_report(anal, chrono::Local::now().naive_local())?;
    write_file(&paths.report, report.as_bytes())?;

    log::info!("wrote output files to {}", out_dir.display());

    Ok(paths)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), PresentationError> {
    fs::write(path, contents).map_err(|source| PresentationError::Io {
        path: path.to_path_buf(),
        source,
    })
}
