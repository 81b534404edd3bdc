use anyhow::Context;
use clap::{Parser, Subcommand};
use daycycle::render::SeriesReport;
use daycycle::sim::{simulate, SimulationConfig, WorkdayWindow};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daycycle")]
#[command(about = "Workday battery and temperature simulation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs a workday simulation and exports the series
    Run {
        /// Starting battery percentage (0-100)
        #[arg(long, default_value_t = 100.0)]
        initial_battery: f64,

        /// Starting device temperature (°C), also the ambient charge target
        #[arg(long, default_value_t = 26.0)]
        initial_temperature: f64,

        /// Battery discharge time constant (minutes)
        #[arg(long, default_value_t = 83.0)]
        tau_discharge: f64,

        /// Battery charge time constant (minutes)
        #[arg(long, default_value_t = 9.0)]
        tau_charge: f64,

        /// Temperature rise time constant during discharge (minutes)
        #[arg(long, default_value_t = 40.0)]
        tau_temp_discharge: f64,

        /// Temperature relaxation time constant during charge (minutes)
        #[arg(long, default_value_t = 15.0)]
        tau_temp_charge: f64,

        /// Discharge interval per cycle (minutes)
        #[arg(long, default_value_t = 3)]
        discharge_time: u32,

        /// Charge interval per cycle (minutes)
        #[arg(long, default_value_t = 2)]
        charge_time: u32,

        /// Thermal threshold (°C)
        #[arg(long, default_value_t = 45.0)]
        temp_threshold: f64,

        /// Read parameters from a JSON map instead of flags
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Output format: csv, json, markdown, or summary
        #[arg(short, long, default_value = "summary")]
        format: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            initial_battery,
            initial_temperature,
            tau_discharge,
            tau_charge,
            tau_temp_discharge,
            tau_temp_charge,
            discharge_time,
            charge_time,
            temp_threshold,
            params_file,
            format,
            output_file,
        } => {
            let config = match params_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading parameter file {:?}", path))?;
                    let params: HashMap<String, f64> =
                        serde_json::from_str(&raw).context("parsing parameter file")?;
                    SimulationConfig::from_map(&params)?
                }
                None => {
                    let config = SimulationConfig {
                        initial_battery_percentage: initial_battery,
                        initial_temperature,
                        tau_discharge_battery: tau_discharge,
                        tau_charge_battery: tau_charge,
                        tau_discharge_temp: tau_temp_discharge,
                        tau_charge_temp: tau_temp_charge,
                        discharge_minutes: discharge_time,
                        charge_minutes: charge_time,
                        temperature_threshold: temp_threshold,
                        battery_floor_percentage: 0.0,
                        discharge_temperature_rise: 10.0,
                    };
                    config.validate()?;
                    config
                }
            };

            let window = WorkdayWindow::standard();
            let series = simulate(&config, &window)?;
            let report = SeriesReport::new(&series, config.temperature_threshold);

            let output = match format.as_str() {
                "csv" => report.to_csv(),
                "json" => report.to_json(),
                "markdown" => report.to_markdown(),
                "summary" => {
                    report.print_summary();
                    return Ok(());
                }
                _ => anyhow::bail!("Unsupported format: {}", format),
            };

            if let Some(path) = output_file {
                std::fs::write(&path, output)?;
                println!("Series saved to {:?}", path);
            } else {
                println!("{}", output);
            }
        }
    }

    Ok(())
}
