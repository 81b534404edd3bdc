//! Daycycle - portable device battery and temperature simulation.
//!
//! Models how a device's battery percentage and internal temperature evolve
//! over a workday of alternating discharge/charge intervals with a midday
//! charging break. Battery and temperature both follow first-order
//! exponential relaxation toward their asymptotes; a thermal cap policy
//! models throttling once the device reaches its temperature threshold.
//!
//! The [`sim`] module is the simulation core; [`render`] consumes a finished
//! time series and exports it (CSV, JSON, Markdown summary). The core has no
//! dependency on any rendering facility.

pub mod render;
pub mod sim;
