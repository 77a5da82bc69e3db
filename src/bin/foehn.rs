//! Trace an air parcel over a mountain and report on the Föhn effect.
//!
//! With no arguments this reproduces the Madeira case. Set `RUST_LOG=debug` to see the
//! condensation level searches.
use anyhow::{Context, Result};
use clap::Parser;
use foehn_analysis::{present, FoehnAnalysis, Observations, Scenario};
use metfor::{Celsius, HectoPascal};
use std::path::PathBuf;

/// Föhn effect analysis of a parcel forced over a mountain
#[derive(Parser, Debug)]
#[command(name = "foehn")]
#[command(about = "Föhn effect parcel analysis", long_about = None)]
struct Args {
    /// Windward surface pressure in hPa
    #[arg(long)]
    surface_pressure: Option<f64>,

    /// Windward surface temperature in °C
    #[arg(short, long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Windward surface dew point in °C
    #[arg(short, long, allow_negative_numbers = true)]
    dew_point: Option<f64>,

    /// Pressure at the summit in hPa
    #[arg(long)]
    summit_pressure: Option<f64>,

    /// Leeward surface pressure in hPa (defaults to the windward surface pressure)
    #[arg(long)]
    leeward_pressure: Option<f64>,

    /// Fraction of the condensate that falls out as precipitation (0-1)
    #[arg(long)]
    precipitation_efficiency: Option<f64>,

    /// Starting preset (madeira, custom)
    #[arg(short, long, default_value = "madeira")]
    preset: String,

    /// Load the scenario from a JSON file instead of a preset
    #[arg(long, conflicts_with = "observations")]
    scenario: Option<PathBuf>,

    /// JSON file of site observations, used with --site
    #[arg(long, requires = "site")]
    observations: Option<PathBuf>,

    /// Windward site to start from in the observations file
    #[arg(long, requires = "observations")]
    site: Option<String>,

    /// Directory for the diagram, table, and report
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Only print to the terminal, don't write any files
    #[arg(long)]
    no_files: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let scenario = build_scenario(&args)?;

    log::info!("analyzing scenario {}", scenario.name);
    let anal = scenario
        .analyze()
        .with_context(|| format!("analysis of {} failed", scenario.name))?;

    print_results(&scenario, &anal)?;

    if !args.no_files {
        let title = format!("Skew-T Log-P Diagram - Föhn Effect, {}", scenario.name);

        // Results are already printed, a failed export is only a warning.
        match present::write_titled_artifacts(&anal, &args.out_dir, &title) {
            Ok(paths) => {
                println!("Diagram: {}", paths.skewt.display());
                println!("Table:   {}", paths.table.display());
                println!("Report:  {}", paths.report.display());
            }
            Err(err) => {
                log::error!("{}", err);
                eprintln!("Warning: output files not written: {}", err);
            }
        }
    }

    Ok(())
}

fn build_scenario(args: &Args) -> Result<Scenario> {
    let preset = Scenario::preset(&args.preset)?;

    let mut scenario = if let Some(path) = &args.scenario {
        Scenario::from_path(path)
            .with_context(|| format!("loading scenario from {}", path.display()))?
    } else if let (Some(path), Some(site)) = (&args.observations, &args.site) {
        let summit = args
            .summit_pressure
            .map(HectoPascal)
            .unwrap_or(preset.summit_pressure);

        Observations::from_path(path)
            .with_context(|| format!("loading observations from {}", path.display()))?
            .scenario_for(site, summit)?
    } else {
        preset
    };

    if let Some(p) = args.surface_pressure {
        scenario.surface_pressure = HectoPascal(p);
    }
    if let Some(t) = args.temperature {
        scenario.surface_temperature = Celsius(t);
    }
    if let Some(dp) = args.dew_point {
        scenario.surface_dew_point = Celsius(dp);
    }
    if let Some(p) = args.summit_pressure {
        scenario.summit_pressure = HectoPascal(p);
    }
    if let Some(p) = args.leeward_pressure {
        scenario.options = scenario
            .options
            .with_leeward_surface_pressure(HectoPascal(p));
    }
    if let Some(pe) = args.precipitation_efficiency {
        scenario.options = scenario.options.with_precipitation_efficiency(pe);
    }

    Ok(scenario)
}

fn print_results(scenario: &Scenario, anal: &FoehnAnalysis) -> Result<()> {
    println!("{}", scenario.name);
    println!();
    println!(
        "{}",
        present::format_table(&present::key_point_rows(anal))?
    );
    println!(
        "{}",
        present::format_report(anal, chrono::Local::now().naive_local())?
    );

    Ok(())
}
