//! Drivers around `transmon-sim`: parameter sampling for convergence sweeps.

pub mod points;
