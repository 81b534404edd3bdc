//! Simulation configuration and the workday calendar window.
//!
//! Both input records are caller-owned and read-only once validated. All
//! degenerate parameter combinations (non-positive time constants, zero
//! durations, an inverted break window, a threshold at or below the ambient
//! temperature) are rejected here, before any model runs, so the scheduling
//! loop itself never has to handle NaN/Inf or non-termination.

use crate::sim::SimError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_battery_floor() -> f64 {
    0.0
}

fn default_temperature_rise() -> f64 {
    10.0
}

/// Immutable parameters for one simulation run.
///
/// Battery percentages are in [0, 100]; temperatures in °C; time constants
/// (tau) in minutes; durations in whole minutes (minute-resolution sampling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting battery percentage (0-100 inclusive).
    pub initial_battery_percentage: f64,
    /// Starting device temperature (°C). Also the ambient baseline the
    /// temperature relaxes toward while charging.
    pub initial_temperature: f64,
    /// Time constant for battery discharge (minutes).
    pub tau_discharge_battery: f64,
    /// Time constant for battery charge (minutes).
    pub tau_charge_battery: f64,
    /// Time constant for temperature rise during discharge (minutes).
    pub tau_discharge_temp: f64,
    /// Time constant for temperature relaxation during charge (minutes).
    pub tau_charge_temp: f64,
    /// Discharge interval per work cycle (minutes, >= 1).
    pub discharge_minutes: u32,
    /// Charge interval per work cycle (minutes, >= 1).
    pub charge_minutes: u32,
    /// Maximum allowable device temperature (°C). Discharge temperature is
    /// capped and latched at this value within a segment.
    pub temperature_threshold: f64,
    /// Asymptotic battery floor the discharge model decays toward.
    #[serde(default = "default_battery_floor")]
    pub battery_floor_percentage: f64,
    /// Temperature rise (delta above segment start) the discharge model
    /// approaches (°C).
    #[serde(default = "default_temperature_rise")]
    pub discharge_temperature_rise: f64,
}

impl SimulationConfig {
    /// Builds a configuration from a parameter mapping.
    ///
    /// Recognized keys: `initial_battery_percentage`, `initial_temperature`,
    /// `mean_tau_discharging`, `mean_tau_charging`, `mean_tau_temp_discharge`,
    /// `mean_tau_temp_charge`, `discharge_time`, `charge_time`,
    /// `temp_threshold`. Optional: `battery_floor`, `delta_temp`.
    ///
    /// Returns [`SimError::MissingField`] for an absent required key and
    /// [`SimError::InvalidField`] if the assembled config fails validation.
    pub fn from_map(params: &HashMap<String, f64>) -> Result<Self, SimError> {
        let get = |key: &str| -> Result<f64, SimError> {
            params
                .get(key)
                .copied()
                .ok_or_else(|| SimError::MissingField(key.to_string()))
        };
        // Durations arrive as f64 map values but are minute counts; anything
        // fractional or below one minute is rejected under the map key name
        // rather than silently truncated.
        let get_minutes = |key: &'static str| -> Result<u32, SimError> {
            let value = get(key)?;
            if value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
                return Err(SimError::InvalidField {
                    field: key,
                    reason: format!("must be a whole number of minutes >= 1, got {}", value),
                });
            }
            Ok(value as u32)
        };

        let config = SimulationConfig {
            initial_battery_percentage: get("initial_battery_percentage")?,
            initial_temperature: get("initial_temperature")?,
            tau_discharge_battery: get("mean_tau_discharging")?,
            tau_charge_battery: get("mean_tau_charging")?,
            tau_discharge_temp: get("mean_tau_temp_discharge")?,
            tau_charge_temp: get("mean_tau_temp_charge")?,
            discharge_minutes: get_minutes("discharge_time")?,
            charge_minutes: get_minutes("charge_time")?,
            temperature_threshold: get("temp_threshold")?,
            battery_floor_percentage: params
                .get("battery_floor")
                .copied()
                .unwrap_or_else(default_battery_floor),
            discharge_temperature_rise: params
                .get("delta_temp")
                .copied()
                .unwrap_or_else(default_temperature_rise),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field invariant, reporting the first violation.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |field: &'static str, reason: String| -> Result<(), SimError> {
            Err(SimError::InvalidField { field, reason })
        };

        if !(0.0..=100.0).contains(&self.initial_battery_percentage) {
            return invalid(
                "initial_battery_percentage",
                format!("must be in [0, 100], got {}", self.initial_battery_percentage),
            );
        }
        for (field, tau) in [
            ("tau_discharge_battery", self.tau_discharge_battery),
            ("tau_charge_battery", self.tau_charge_battery),
            ("tau_discharge_temp", self.tau_discharge_temp),
            ("tau_charge_temp", self.tau_charge_temp),
        ] {
            if tau <= 0.0 || !tau.is_finite() {
                return invalid(
                    field,
                    format!("time constant must be strictly positive, got {}", tau),
                );
            }
        }
        if self.discharge_minutes == 0 {
            return invalid(
                "discharge_minutes",
                "discharge interval must be at least 1 minute".to_string(),
            );
        }
        if self.charge_minutes == 0 {
            return invalid(
                "charge_minutes",
                "charge interval must be at least 1 minute".to_string(),
            );
        }
        if self.temperature_threshold <= self.initial_temperature {
            return invalid(
                "temperature_threshold",
                format!(
                    "threshold ({}) must exceed initial temperature ({})",
                    self.temperature_threshold, self.initial_temperature
                ),
            );
        }
        if self.battery_floor_percentage >= self.initial_battery_percentage {
            return invalid(
                "battery_floor_percentage",
                format!(
                    "floor ({}) must be below the initial battery percentage ({})",
                    self.battery_floor_percentage, self.initial_battery_percentage
                ),
            );
        }
        if self.discharge_temperature_rise <= 0.0 {
            return invalid(
                "discharge_temperature_rise",
                format!("must be strictly positive, got {}", self.discharge_temperature_rise),
            );
        }
        Ok(())
    }
}

/// The fixed calendar interval the simulation runs over, including the
/// reserved break sub-interval.
///
/// Invariant: `start < break_start < break_end < end`. The break duration is
/// derived from the window, not a constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkdayWindow {
    pub start: NaiveDateTime,
    pub break_start: NaiveDateTime,
    pub break_end: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WorkdayWindow {
    /// Creates a window, rejecting any ordering violation.
    pub fn new(
        start: NaiveDateTime,
        break_start: NaiveDateTime,
        break_end: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, SimError> {
        if !(start < break_start && break_start < break_end && break_end < end) {
            return Err(SimError::InvalidField {
                field: "workday_window",
                reason: format!(
                    "timestamps must satisfy start < break_start < break_end < end, \
                     got {} / {} / {} / {}",
                    start, break_start, break_end, end
                ),
            });
        }
        // Sampling is minute-resolution: a break shorter than one whole
        // minute derives a zero-length break segment, which would stall the
        // scheduling loop at break_start.
        if break_end - break_start < Duration::minutes(1) {
            return Err(SimError::InvalidField {
                field: "workday_window",
                reason: format!(
                    "break must span at least one whole minute, got {} to {}",
                    break_start, break_end
                ),
            });
        }
        Ok(WorkdayWindow {
            start,
            break_start,
            break_end,
            end,
        })
    }

    /// The reference workday: 2024-10-12, 08:00-16:00 with a 12:00-13:00 break.
    pub fn standard() -> Self {
        let day = NaiveDate::from_ymd_opt(2024, 10, 12).unwrap();
        WorkdayWindow {
            start: day.and_hms_opt(8, 0, 0).unwrap(),
            break_start: day.and_hms_opt(12, 0, 0).unwrap(),
            break_end: day.and_hms_opt(13, 0, 0).unwrap(),
            end: day.and_hms_opt(16, 0, 0).unwrap(),
        }
    }

    /// Break length in whole minutes, derived from the window.
    pub fn break_minutes(&self) -> u32 {
        (self.break_end - self.break_start).num_minutes() as u32
    }

    /// True if `t` falls inside the half-open break interval.
    pub fn in_break(&self, t: NaiveDateTime) -> bool {
        self.break_start <= t && t < self.break_end
    }

    /// Validates the ordering invariant (for windows built via serde).
    pub fn validate(&self) -> Result<(), SimError> {
        Self::new(self.start, self.break_start, self.break_end, self.end).map(|_| ())
    }
}

/// Minute arithmetic helper used by the scheduler.
pub(crate) fn add_minutes(t: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    t + Duration::minutes(minutes as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_config() -> SimulationConfig {
        SimulationConfig {
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
        }
    }

    #[test]
    fn test_reference_config_is_valid() {
        assert!(reference_config().validate().is_ok());
    }

    #[test]
    fn test_nonpositive_tau_rejected() {
        let mut config = reference_config();
        config.tau_charge_battery = 0.0;
        match config.validate() {
            Err(SimError::InvalidField { field, .. }) => {
                assert_eq!(field, "tau_charge_battery");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut config = reference_config();
        config.discharge_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_below_ambient_rejected() {
        let mut config = reference_config();
        config.temperature_threshold = 26.0;
        match config.validate() {
            Err(SimError::InvalidField { field, .. }) => {
                assert_eq!(field, "temperature_threshold");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    fn reference_params() -> HashMap<String, f64> {
        let mut params = HashMap::new();
        params.insert("initial_battery_percentage".to_string(), 100.0);
        params.insert("initial_temperature".to_string(), 26.0);
        params.insert("mean_tau_discharging".to_string(), 83.0);
        params.insert("mean_tau_charging".to_string(), 9.0);
        params.insert("mean_tau_temp_discharge".to_string(), 40.0);
        params.insert("mean_tau_temp_charge".to_string(), 15.0);
        params.insert("discharge_time".to_string(), 3.0);
        params.insert("charge_time".to_string(), 2.0);
        params.insert("temp_threshold".to_string(), 45.0);
        params
    }

    #[test]
    fn test_from_map_matches_struct_literal() {
        let config = SimulationConfig::from_map(&reference_params()).unwrap();
        assert_eq!(config, reference_config());
    }

    #[test]
    fn test_from_map_missing_key() {
        let mut params = HashMap::new();
        params.insert("initial_battery_percentage".to_string(), 100.0);
        match SimulationConfig::from_map(&params) {
            Err(SimError::MissingField(key)) => assert_eq!(key, "initial_temperature"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_from_map_missing_threshold() {
        let mut params = reference_params();
        params.remove("temp_threshold");
        match SimulationConfig::from_map(&params) {
            Err(SimError::MissingField(key)) => assert_eq!(key, "temp_threshold"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_from_map_fractional_duration_rejected() {
        let mut params = reference_params();
        params.insert("discharge_time".to_string(), 3.7);
        match SimulationConfig::from_map(&params) {
            Err(SimError::InvalidField { field, .. }) => assert_eq!(field, "discharge_time"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_from_map_negative_duration_rejected() {
        let mut params = reference_params();
        params.insert("charge_time".to_string(), -2.0);
        match SimulationConfig::from_map(&params) {
            Err(SimError::InvalidField { field, .. }) => assert_eq!(field, "charge_time"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_window_ordering_enforced() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 12).unwrap();
        let result = WorkdayWindow::new(
            day.and_hms_opt(8, 0, 0).unwrap(),
            day.and_hms_opt(13, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 0).unwrap(),
            day.and_hms_opt(16, 0, 0).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sub_minute_break_rejected() {
        // 30-second break: strictly ordered, but derives a zero-minute break
        // segment that could never advance the scheduler clock.
        let day = NaiveDate::from_ymd_opt(2024, 10, 12).unwrap();
        let result = WorkdayWindow::new(
            day.and_hms_opt(8, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 30).unwrap(),
            day.and_hms_opt(16, 0, 0).unwrap(),
        );
        match result {
            Err(SimError::InvalidField { field, .. }) => assert_eq!(field, "workday_window"),
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_standard_window_break_is_derived() {
        let window = WorkdayWindow::standard();
        assert_eq!(window.break_minutes(), 60);
        assert!(window.in_break(window.break_start));
        assert!(!window.in_break(window.break_end));
    }
}
