//! Phase scheduler: the state machine that stitches discharge, charge, and
//! break segments into one continuous workday time series.
//!
//! The scheduler owns a running `(battery, temperature, current_time)` triple
//! and a [`TimeSeries`] accumulator. Each segment is seeded with the previous
//! segment's terminal values and contributes minute offsets `0..duration-1`
//! relative to its own start time; there is no separate pre-phase seed
//! sample, so sample 0 of the first segment carries the initial condition
//! and the series length equals the sum of all segment durations.
//!
//! Two deliberate boundary policies, both faithful to the reference model:
//! - The break window is checked only at cycle boundaries. A discharge/charge
//!   cycle that would straddle `break_start` runs to completion and the break
//!   begins at the next boundary.
//! - The final cycle's full duration is emitted even when it runs past
//!   `workday_end`, so the series may extend past the window when the cycle
//!   length does not divide the remaining minutes.

use crate::sim::config::{add_minutes, SimulationConfig, WorkdayWindow};
use crate::sim::{relaxation, thermal_cap, SimError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One contiguous scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Work interval: battery drains, temperature rises toward its cap.
    Discharging,
    /// Recharge interval: battery rises toward 100%, temperature relaxes
    /// toward the ambient baseline.
    Charging,
    /// Midday break: continuous charging for the whole break window.
    OnBreak,
}

/// The three aligned output sequences of a simulation run.
///
/// Insertion order is chronological; lengths are always equal. Owned by the
/// scheduler while running, immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub battery: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl TimeSeries {
    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True if no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Appends one segment's samples, minute-indexed from `segment_start`.
    fn push_segment(&mut self, segment_start: NaiveDateTime, battery: &[f64], temperature: &[f64]) {
        debug_assert_eq!(battery.len(), temperature.len());
        self.timestamps
            .extend((0..battery.len() as u32).map(|i| add_minutes(segment_start, i)));
        self.battery.extend_from_slice(battery);
        self.temperature.extend_from_slice(temperature);
    }
}

/// Running simulation state: the carried-forward seed for the next segment.
struct SchedulerState {
    current_time: NaiveDateTime,
    battery: f64,
    temperature: f64,
}

impl SchedulerState {
    /// Records a finished segment and advances the clock past it. The
    /// segment's terminal values become the seed for the next phase.
    fn advance(
        &mut self,
        series: &mut TimeSeries,
        phase: Phase,
        battery: Vec<f64>,
        temperature: Vec<f64>,
    ) {
        series.push_segment(self.current_time, &battery, &temperature);
        self.battery = *battery.last().unwrap_or(&self.battery);
        self.temperature = *temperature.last().unwrap_or(&self.temperature);
        self.current_time = add_minutes(self.current_time, battery.len() as u32);
        debug!(
            ?phase,
            minutes = battery.len(),
            battery = self.battery,
            temperature = self.temperature,
            until = %self.current_time,
            "segment complete"
        );
    }
}

/// Runs the workday simulation, producing the three aligned series.
///
/// Validates both inputs first; once the loop starts, the computation is pure
/// arithmetic over validated constants and cannot fail. Deterministic: equal
/// inputs yield bit-for-bit equal output.
pub fn simulate(
    config: &SimulationConfig,
    window: &WorkdayWindow,
) -> Result<TimeSeries, SimError> {
    config.validate()?;
    window.validate()?;

    let mut series = TimeSeries::default();
    let mut state = SchedulerState {
        current_time: window.start,
        battery: config.initial_battery_percentage,
        temperature: config.initial_temperature,
    };

    while state.current_time < window.end {
        if window.in_break(state.current_time) {
            run_break(config, window, &mut state, &mut series);
        } else {
            run_work_cycle(config, &mut state, &mut series);
        }
    }

    debug!(
        samples = series.len(),
        final_battery = state.battery,
        final_temperature = state.temperature,
        "workday simulation complete"
    );
    Ok(series)
}

/// Midday break: one continuous charge segment spanning the break window.
///
/// The temperature asymptote is the configured ambient baseline
/// (`initial_temperature`), not the pre-break temperature.
fn run_break(
    config: &SimulationConfig,
    window: &WorkdayWindow,
    state: &mut SchedulerState,
    series: &mut TimeSeries,
) {
    let minutes = window.break_minutes();
    let battery = clamp_full(relaxation::charge_battery(
        minutes,
        state.battery,
        config.tau_charge_battery,
        100.0,
    ));
    let temperature = relaxation::charge_temperature(
        minutes,
        state.temperature,
        config.tau_charge_temp,
        config.initial_temperature,
    );
    state.advance(series, Phase::OnBreak, battery, temperature);
}

/// One regular work cycle: a discharge segment followed by a charge segment.
fn run_work_cycle(config: &SimulationConfig, state: &mut SchedulerState, series: &mut TimeSeries) {
    // Discharge: battery decays toward the floor, temperature rises and is
    // capped/latched at the threshold.
    let battery = relaxation::discharge_battery(
        config.discharge_minutes,
        state.battery,
        config.tau_discharge_battery,
        config.battery_floor_percentage,
    );
    let mut temperature = relaxation::discharge_temperature(
        config.discharge_minutes,
        state.temperature,
        config.tau_discharge_temp,
        config.discharge_temperature_rise,
    );
    thermal_cap::apply_thermal_cap(&mut temperature, config.temperature_threshold);
    state.advance(series, Phase::Discharging, battery, temperature);

    // Charge: battery saturates at 100%, temperature relaxes toward ambient.
    let battery = clamp_full(relaxation::charge_battery(
        config.charge_minutes,
        state.battery,
        config.tau_charge_battery,
        100.0,
    ));
    let temperature = relaxation::charge_temperature(
        config.charge_minutes,
        state.temperature,
        config.tau_charge_temp,
        config.initial_temperature,
    );
    state.advance(series, Phase::Charging, battery, temperature);
}

/// Saturates a charge trajectory at 100%.
fn clamp_full(mut samples: Vec<f64>) -> Vec<f64> {
    for sample in &mut samples {
        if *sample > 100.0 {
            *sample = 100.0;
        }
    }
    samples
}
