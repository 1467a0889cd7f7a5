//! Parameter points for convergence sweeps.
//!
//! Each point is a row of 16 values ordered as
//! `Ec1..Ec5, Ej1..Ej5, E12, E23, E13, E34, E45, E35`.

use ndarray as nd;
use rand::Rng;
use transmon_sim::{ Result, TransmonParams, hamiltonian::NUM_PARAMS };

/// Bounds of the sampled parameter space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamRanges {
    /// Charging energy used for the regular Ej scan.
    pub ec_fixed: f64,
    pub ec: (u32, u32),
    pub ej: (u32, u32),
    pub coupling: (f64, f64),
    /// Number of evenly spaced Ej values in the regular scan.
    pub num_scan: usize,
    /// Number of uniformly random points.
    pub num_random: usize,
}

impl Default for ParamRanges {
    fn default() -> Self {
        Self {
            ec_fixed: 200.0,
            ec: (40, 1000),
            ej: (6000, 20000),
            coupling: (-100.0, 100.0),
            num_scan: 14,
            num_random: 100,
        }
    }
}

impl ParamRanges {
    /// Total number of generated points.
    pub fn num_points(&self) -> usize { self.num_scan + self.num_random }
}

/// Generate sweep points: first a scan over identical transmons with Ej
/// evenly spaced over its range and all couplings at their maximum, then
/// uniformly random points with integer Ec and Ej and couplings rounded to two
/// decimals.
pub fn gen_points<R>(ranges: &ParamRanges, rng: &mut R) -> nd::Array2<f64>
where R: Rng
{
    let mut points: nd::Array2<f64>
        = nd::Array2::zeros((ranges.num_points(), NUM_PARAMS));
    let ej_scan: nd::Array1<f64>
        = nd::Array1::linspace(
            f64::from(ranges.ej.0), f64::from(ranges.ej.1), ranges.num_scan);
    let e_max = ranges.coupling.1;
    for (mut row, ej) in points.outer_iter_mut().zip(ej_scan.iter()) {
        row.slice_mut(nd::s![0..5]).fill(ranges.ec_fixed);
        row.slice_mut(nd::s![5..10]).fill(*ej);
        row.slice_mut(nd::s![10..16]).fill(e_max);
    }
    let (c_lo, c_hi) = ranges.coupling;
    for mut row in points.outer_iter_mut().skip(ranges.num_scan) {
        for k in 0..5 {
            row[k] = f64::from(rng.gen_range(ranges.ec.0..=ranges.ec.1));
            row[k + 5] = f64::from(rng.gen_range(ranges.ej.0..=ranges.ej.1));
        }
        for k in 10..16 {
            let e: f64 = rng.gen::<f64>() * (c_hi - c_lo) + c_lo;
            row[k] = (e * 100.0).round() / 100.0;
        }
    }
    points
}

/// Convert each row of a points array into [`TransmonParams`].
pub fn to_params(points: &nd::Array2<f64>) -> Result<Vec<TransmonParams>> {
    points.outer_iter()
        .map(|row| TransmonParams::from_slice(&row.to_vec()))
        .collect()
}
