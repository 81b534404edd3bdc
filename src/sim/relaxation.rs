//! First-order exponential relaxation models.
//!
//! Each model produces a minute-resolution trajectory of length `minutes`,
//! where sample `i` is evaluated at offset `t = i` minutes from the start of
//! the segment. The models are pure: no clamping or capping happens here.
//! Battery saturation (<= 100%) and the thermal cap are applied by the
//! caller. Time constants are validated strictly positive before any model
//! runs, so the exponents are always finite.

/// Battery percentage during discharge: decays from `v0` toward `v_final`.
///
/// `V(t) = V_final + (V0 - V_final) * exp(-t / tau)`
pub fn discharge_battery(minutes: u32, v0: f64, tau: f64, v_final: f64) -> Vec<f64> {
    (0..minutes)
        .map(|t| v_final + (v0 - v_final) * (-(t as f64) / tau).exp())
        .collect()
}

/// Battery percentage during charge: rises from `v0` toward `v_final`.
///
/// `V(t) = V_final - (V_final - V0) * exp(-t / tau)`
pub fn charge_battery(minutes: u32, v0: f64, tau: f64, v_final: f64) -> Vec<f64> {
    (0..minutes)
        .map(|t| v_final - (v_final - v0) * (-(t as f64) / tau).exp())
        .collect()
}

/// Device temperature during discharge: rises from `t0` toward `t0 + delta_t`.
///
/// `T(t) = T0 + delta_T * (1 - exp(-t / tau))`
pub fn discharge_temperature(minutes: u32, t0: f64, tau: f64, delta_t: f64) -> Vec<f64> {
    (0..minutes)
        .map(|t| t0 + delta_t * (1.0 - (-(t as f64) / tau).exp()))
        .collect()
}

/// Device temperature during charge: relaxes from `t0` toward `t_final`.
///
/// `T(t) = T_final + (T0 - T_final) * exp(-t / tau)`
pub fn charge_temperature(minutes: u32, t0: f64, tau: f64, t_final: f64) -> Vec<f64> {
    (0..minutes)
        .map(|t| t_final + (t0 - t_final) * (-(t as f64) / tau).exp())
        .collect()
}
