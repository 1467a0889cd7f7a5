//! Convergence of low-lying levels with respect to the truncation `M`.
//!
//! For each parameter point, levels (measured from the ground state) computed
//! at every `M` are compared against those at the largest `M`, and the worst
//! relative error over points and levels is reported per `M`.

use log::info;
use ndarray::{ self as nd, s };
use crate::{
    config::SolverConfig,
    diag::Diagonalize,
    error::{ Result, config_err },
    hamiltonian::{ HBuilderFive, TransmonParams },
};

/// Levels `1..=num_levels` of an ascending spectrum, measured from its lowest
/// value.
pub fn relative_levels(values: &nd::Array1<f64>, num_levels: usize)
    -> Result<nd::Array1<f64>>
{
    if values.len() <= num_levels {
        config_err!(
            "spectrum has {} values; need more than {}",
            values.len(), num_levels,
        );
    }
    let ground = values[0];
    Ok(values.slice(s![1..=num_levels]).mapv(|e| e - ground))
}

/// Relative error of each row of `levels` (one row per `M`, ascending) with
/// respect to the last row.
pub fn relative_errors(levels: &nd::Array2<f64>) -> nd::Array2<f64> {
    let Some(last) = levels.outer_iter().last() else {
        return levels.clone();
    };
    let last = last.to_owned();
    let mut errs = levels.clone();
    errs.outer_iter_mut()
        .for_each(|mut row| {
            row.zip_mut_with(&last, |l, f| { *l = (*l - f) / f; });
        });
    errs
}

/// Maximum absolute relative error per `M` over a collection of relative
/// error arrays (one per parameter point, shaped like [`relative_errors`]'s
/// output).
pub fn max_abs_error<'a, I>(errors: I, num_m: usize) -> nd::Array1<f64>
where I: IntoIterator<Item = &'a nd::Array2<f64>>
{
    let mut maxed: nd::Array1<f64> = nd::Array1::zeros(num_m);
    for err in errors.into_iter() {
        maxed.iter_mut().zip(err.outer_iter())
            .for_each(|(mx, row)| {
                *mx = row.iter().fold(*mx, |acc, e| acc.max(e.abs()));
            });
    }
    maxed
}

/// Result of a convergence sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
    /// Truncations, ascending.
    pub ms: Vec<usize>,
    /// Worst relative error at each truncation.
    pub max_rel_err: nd::Array1<f64>,
}

/// Compute per-`M` relative errors of the lowest `num_levels` levels for a
/// single parameter point.
pub fn point_errors(
    params: &TransmonParams,
    ms: &[usize],
    c: usize,
    num_levels: usize,
    solver: &dyn Diagonalize,
) -> Result<nd::Array2<f64>>
{
    let mut levels: nd::Array2<f64> = nd::Array2::zeros((ms.len(), num_levels));
    for (mut row, &m) in levels.outer_iter_mut().zip(ms) {
        let config = SolverConfig { m, c, ..SolverConfig::default() };
        let values
            = HBuilderFive::new(*params, config)?.eigenvalues_with(solver)?;
        row.assign(&relative_levels(&values, num_levels)?);
    }
    Ok(relative_errors(&levels))
}

/// Sweep truncations `ms` (which must be ascending) over all parameter points
/// and report the worst relative error of the lowest `num_levels` levels at
/// each `M`.
pub fn sweep<'a, I>(
    points: I,
    ms: &[usize],
    c: usize,
    num_levels: usize,
    solver: &dyn Diagonalize,
) -> Result<ConvergenceReport>
where I: IntoIterator<Item = &'a TransmonParams>
{
    if ms.is_empty() { config_err!("no truncations to sweep"); }
    if ms.windows(2).any(|w| w[0] >= w[1]) {
        config_err!("truncations must be strictly ascending: {:?}", ms);
    }
    let mut errors: Vec<nd::Array2<f64>> = Vec::new();
    for (k, params) in points.into_iter().enumerate() {
        info!("point {}: {:?}", k, params.to_array());
        errors.push(point_errors(params, ms, c, num_levels, solver)?);
    }
    let max_rel_err = max_abs_error(&errors, ms.len());
    for (m, err) in ms.iter().zip(max_rel_err.iter()) {
        info!("M = {:>3}: max relative error {:.3e}", m, err);
    }
    Ok(ConvergenceReport { ms: ms.to_vec(), max_rel_err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::{ diag::Lapack, hamiltonian::Couplings };

    #[test]
    fn levels_from_ground() {
        let values = nd::array![-1.0, 0.5, 2.0, 3.0];
        let lv = relative_levels(&values, 2).unwrap();
        assert_eq!(lv, nd::array![1.5, 3.0]);
        assert!(relative_levels(&values, 4).is_err());
    }

    #[test]
    fn errors_against_last_row() {
        let levels = nd::array![[1.1, 2.4], [1.0, 2.0]];
        let errs = relative_errors(&levels);
        assert_relative_eq!(errs[[0, 0]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(errs[[0, 1]], 0.2, epsilon = 1e-12);
        assert_eq!(errs.row(1).to_vec(), vec![0.0, 0.0]);
        let other = nd::array![[-0.3, 0.05], [0.0, 0.0]];
        let maxed = max_abs_error([&errs, &other], 2);
        assert_relative_eq!(maxed[0], 0.3, epsilon = 1e-12);
        assert_eq!(maxed[1], 0.0);
    }

    #[test]
    fn rejects_unsorted_truncations() {
        let params = TransmonParams::identical(1.0, 50.0, Couplings::zero());
        assert!(sweep([&params], &[4, 2], 10, 3, &Lapack).is_err());
        assert!(sweep([&params], &[], 10, 3, &Lapack).is_err());
    }

    #[test]
    fn errors_shrink_with_m() {
        let couplings
            = Couplings::from_values([0.5, 0.5, 0.05, 0.5, 0.5, 0.05]);
        let params = TransmonParams::identical(1.0, 50.0, couplings);
        let ms = [1, 3, 5];
        let report = sweep([&params], &ms, 15, 5, &Lapack).unwrap();
        let err = &report.max_rel_err;
        assert_eq!(err[2], 0.0);
        assert!(err[1] < err[0]);
        assert!(err[1] < 1e-2);
    }
}
