//! Export and summary rendering for a simulation time series.
//!
//! Follows the one-result, many-formats pattern: a [`SeriesReport`] borrows a
//! finished [`TimeSeries`] and can emit CSV rows, a JSON record set, or a
//! Markdown summary with the thermal-threshold annotation.

use crate::sim::TimeSeries;
use serde::Serialize;
use std::fmt::Write as _;

/// Renders a finished time series in several export formats.
pub struct SeriesReport<'a> {
    series: &'a TimeSeries,
    /// Thermal threshold (°C) used for the annotation and the
    /// minutes-at-threshold statistic.
    temperature_threshold: f64,
}

/// One exported sample row (JSON shape).
#[derive(Debug, Serialize)]
struct SampleRecord {
    timestamp: String,
    battery_pct: f64,
    temperature_c: f64,
}

impl<'a> SeriesReport<'a> {
    pub fn new(series: &'a TimeSeries, temperature_threshold: f64) -> Self {
        SeriesReport {
            series,
            temperature_threshold,
        }
    }

    /// CSV export: header plus one `timestamp,battery_pct,temperature_c` row
    /// per sample.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("timestamp,battery_pct,temperature_c\n");
        for i in 0..self.series.len() {
            let _ = writeln!(
                out,
                "{},{:.4},{:.4}",
                self.series.timestamps[i], self.series.battery[i], self.series.temperature[i]
            );
        }
        out
    }

    /// JSON export: an array of sample records.
    pub fn to_json(&self) -> String {
        let records: Vec<SampleRecord> = (0..self.series.len())
            .map(|i| SampleRecord {
                timestamp: self.series.timestamps[i].to_string(),
                battery_pct: self.series.battery[i],
                temperature_c: self.series.temperature[i],
            })
            .collect();
        serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
    }

    /// Markdown summary table with the threshold annotation.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Workday Simulation Summary\n\n");
        out.push_str("| Metric | Value |\n");
        out.push_str("|--------|-------|\n");
        if let (Some(first), Some(last)) =
            (self.series.timestamps.first(), self.series.timestamps.last())
        {
            let _ = writeln!(out, "| Window | {} .. {} |", first, last);
        }
        let _ = writeln!(out, "| Samples | {} |", self.series.len());
        let _ = writeln!(out, "| Min battery | {:.1}% |", self.min_battery());
        let _ = writeln!(out, "| Final battery | {:.1}% |", self.final_battery());
        let _ = writeln!(out, "| Peak temperature | {:.1}°C |", self.peak_temperature());
        let _ = writeln!(
            out,
            "| Minutes at threshold ({}°C) | {} |",
            self.temperature_threshold,
            self.minutes_at_threshold()
        );
        out
    }

    /// Prints the summary statistics to the terminal.
    pub fn print_summary(&self) {
        println!("=== Workday Simulation Summary ===");
        println!("Samples:           {}", self.series.len());
        println!("Min battery:       {:.1}%", self.min_battery());
        println!("Final battery:     {:.1}%", self.final_battery());
        println!("Peak temperature:  {:.1}°C", self.peak_temperature());
        println!(
            "At threshold:      {} min (threshold {}°C)",
            self.minutes_at_threshold(),
            self.temperature_threshold
        );
    }

    /// Lowest battery percentage reached over the day.
    pub fn min_battery(&self) -> f64 {
        self.series.battery.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Battery percentage at the last sample.
    pub fn final_battery(&self) -> f64 {
        self.series.battery.last().copied().unwrap_or(f64::NAN)
    }

    /// Highest temperature reached over the day.
    pub fn peak_temperature(&self) -> f64 {
        self.series
            .temperature
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of samples pinned at the thermal threshold.
    pub fn minutes_at_threshold(&self) -> usize {
        self.series
            .temperature
            .iter()
            .filter(|&&t| t >= self.temperature_threshold)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{simulate, SimulationConfig, WorkdayWindow};

    fn reference_series() -> (TimeSeries, f64) {
        let config = SimulationConfig {
            initial_battery_percentage: 100.0,
            initial_temperature: 26.0,
            tau_discharge_battery: 83.0,
            tau_charge_battery: 9.0,
            tau_discharge_temp: 40.0,
            tau_charge_temp: 15.0,
            discharge_minutes: 3,
            charge_minutes: 2,
            temperature_threshold: 45.0,
            battery_floor_percentage: 0.0,
            discharge_temperature_rise: 10.0,
        };
        let series = simulate(&config, &WorkdayWindow::standard()).unwrap();
        (series, config.temperature_threshold)
    }

    #[test]
    fn test_csv_row_count() {
        let (series, threshold) = reference_series();
        let report = SeriesReport::new(&series, threshold);
        let csv = report.to_csv();
        // Header plus one row per sample, trailing newline.
        assert_eq!(csv.lines().count(), series.len() + 1);
        assert!(csv.starts_with("timestamp,battery_pct,temperature_c\n"));
    }

    #[test]
    fn test_json_parses_back() {
        let (series, threshold) = reference_series();
        let report = SeriesReport::new(&series, threshold);
        let parsed: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), series.len());
    }

    #[test]
    fn test_markdown_contains_threshold_annotation() {
        let (series, threshold) = reference_series();
        let report = SeriesReport::new(&series, threshold);
        let md = report.to_markdown();
        assert!(md.contains("Minutes at threshold (45°C)"));
        assert!(md.contains("| Samples | 480 |"));
    }

    #[test]
    fn test_summary_statistics() {
        let (series, threshold) = reference_series();
        let report = SeriesReport::new(&series, threshold);
        assert!(report.min_battery() > 0.0);
        assert!(report.min_battery() <= 100.0);
        assert!(report.peak_temperature() >= 26.0);
        assert!(report.peak_temperature() <= threshold);
    }
}
