//! Thermal cap policy for discharge temperature segments.
//!
//! Models thermal throttling: a rising discharge temperature is clamped at
//! the configured threshold, and once a sample reaches the threshold the
//! rest of the segment stays pinned there. The latch is segment-local; a new
//! discharge phase starts fresh from its carried-forward seed temperature.

/// Clamps a discharge-temperature trajectory at `threshold` and latches it
/// there from the first sample that reaches the threshold onward.
///
/// Mutates the trajectory in place. The latch does not persist across
/// segments; only the final numeric value does.
pub fn apply_thermal_cap(samples: &mut [f64], threshold: f64) {
    for sample in samples.iter_mut() {
        if *sample > threshold {
            *sample = threshold;
        }
    }
    if let Some(first_hit) = samples.iter().position(|&s| s == threshold) {
        for sample in &mut samples[first_hit..] {
            *sample = threshold;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::relaxation::discharge_temperature;

    #[test]
    fn test_no_cap_below_threshold() {
        let mut samples = discharge_temperature(5, 26.0, 40.0, 10.0);
        let original = samples.clone();
        apply_thermal_cap(&mut samples, 45.0);
        assert_eq!(samples, original);
    }

    #[test]
    fn test_samples_never_exceed_threshold() {
        // Large rise, fast tau: the curve crosses 30°C within the segment.
        let mut samples = discharge_temperature(60, 26.0, 5.0, 20.0);
        apply_thermal_cap(&mut samples, 30.0);
        assert!(samples.iter().all(|&s| s <= 30.0));
    }

    #[test]
    fn test_latch_holds_after_first_hit() {
        let mut samples = vec![28.0, 29.5, 30.0, 29.8, 31.0];
        apply_thermal_cap(&mut samples, 30.0);
        assert_eq!(samples, vec![28.0, 29.5, 30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_latch_fires_at_index_zero() {
        // Seed already at or above the threshold: whole segment pins there.
        let mut samples = discharge_temperature(10, 50.0, 40.0, 10.0);
        apply_thermal_cap(&mut samples, 45.0);
        assert!(samples.iter().all(|&s| s == 45.0));
    }
}
