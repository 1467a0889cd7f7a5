//! Single-transmon spectra in the charge basis.

use ndarray::{ self as nd, s };
use ndarray_linalg::{ EighInto, UPLO };
use crate::error::{ Result, config_err };

/// Charging and Josephson energies of a single transmon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transmon {
    pub ec: f64,
    pub ej: f64,
}

impl Transmon {
    /// Create a new `Transmon`.
    pub fn new(ec: f64, ej: f64) -> Self { Self { ec, ej } }

    /// Compute the transmon's spectrum in a charge basis of half-width `c`,
    /// truncated to the lowest `n` levels.
    ///
    /// See [`solve_transmon`].
    pub fn solve(&self, c: usize, n: usize) -> Result<TransmonSpectrum> {
        solve_transmon(self.ec, self.ej, c, n)
    }
}

/// Lowest eigenenergies of a single transmon and its charge operator in the
/// corresponding eigenbasis.
#[derive(Clone, Debug, PartialEq)]
pub struct TransmonSpectrum {
    /// Energies in ascending order.
    pub energies: nd::Array1<f64>,
    /// Charge operator `n` expressed in the energy eigenbasis.
    pub charge: nd::Array2<f64>,
}

impl TransmonSpectrum {
    /// Number of kept levels.
    pub fn levels(&self) -> usize { self.energies.len() }
}

/// Build the charge-basis Hamiltonian
/// ```text
/// H = 4 Ec n^2 - (Ej / 2) (|n><n + 1| + |n + 1><n|),  n = -C, ..., C
/// ```
/// as a dense matrix.
pub fn charge_hamiltonian(ec: f64, ej: f64, c: usize) -> nd::Array2<f64> {
    let dim = 2 * c + 1;
    let mut H: nd::Array2<f64> = nd::Array2::zeros((dim, dim));
    let c = c as f64;
    H.diag_mut().iter_mut().enumerate()
        .for_each(|(k, h)| {
            let n = k as f64 - c;
            *h = 4.0 * ec * n * n;
        });
    let hop = -ej / 2.0;
    for k in 1..dim {
        H[[k, k - 1]] = hop;
        H[[k - 1, k]] = hop;
    }
    H
}

/// Diagonalize a single transmon in the charge basis `-C..=C` and keep the
/// lowest `n` levels.
///
/// The charge operator, diagonal in the charge basis, is carried into the
/// energy eigenbasis by `V^T diag(n) V` before truncation. Whether `c` is large
/// enough for the requested energies is not checked here.
pub fn solve_transmon(ec: f64, ej: f64, c: usize, n: usize)
    -> Result<TransmonSpectrum>
{
    if !ec.is_finite() || !ej.is_finite() || ec < 0.0 || ej < 0.0 {
        config_err!("invalid transmon energies Ec = {}, Ej = {}", ec, ej);
    }
    let dim = 2 * c + 1;
    if n == 0 || n > dim {
        config_err!(
            "cannot keep {} levels from a charge basis of {} states", n, dim);
    }
    let (E, V) = charge_hamiltonian(ec, ej, c).eigh_into(UPLO::Lower)?;
    let V = V.slice_move(s![.., ..n]);
    let charges: nd::Array1<f64>
        = (0..dim).map(|k| k as f64 - c as f64).collect();
    // V^T diag(n) V, with diag(n) applied row-wise
    let nV: nd::Array2<f64> = &V * &charges.view().insert_axis(nd::Axis(1));
    let charge: nd::Array2<f64> = V.t().dot(&nV);
    let energies: nd::Array1<f64> = E.slice_move(s![..n]);
    Ok(TransmonSpectrum { energies, charge })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn free_charge_levels() {
        // with Ej = 0 the charge states are eigenstates: 0, 4, 4, 16, 16, ...
        let spec = solve_transmon(1.0, 0.0, 3, 5).unwrap();
        let expected = [0.0, 4.0, 4.0, 16.0, 16.0];
        spec.energies.iter().zip(expected)
            .for_each(|(e, x)| assert_relative_eq!(*e, x, epsilon = 1e-10));
    }

    #[test]
    fn charge_operator_symmetric() {
        let spec = solve_transmon(1.0, 50.0, 20, 6).unwrap();
        assert_eq!(spec.charge.dim(), (6, 6));
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(
                    spec.charge[[i, j]], spec.charge[[j, i]], epsilon = 1e-10);
            }
        }
        // parity symmetry of the potential: n has no diagonal elements
        spec.charge.diag().iter()
            .for_each(|d| assert!(d.abs() < 1e-8));
    }

    #[test]
    fn energies_ascending() {
        let spec = solve_transmon(200.0, 12000.0, 30, 10).unwrap();
        assert!(spec.energies.windows(2).into_iter().all(|w| w[0] <= w[1]));
    }

    #[test]
    fn transmon_regime_spacing() {
        // E_01 ~ sqrt(8 Ej Ec) - Ec deep in the transmon regime
        let ec = 1.0;
        let ej = 50.0;
        let spec = Transmon::new(ec, ej).solve(30, 3).unwrap();
        let e01 = spec.energies[1] - spec.energies[0];
        let approx = (8.0 * ej * ec).sqrt() - ec;
        assert!((e01 - approx).abs() / approx < 0.05);
    }

    #[test]
    fn too_many_levels() {
        assert!(solve_transmon(1.0, 50.0, 2, 6).is_err());
        assert!(solve_transmon(1.0, 50.0, 2, 5).is_ok());
        assert!(solve_transmon(-1.0, 50.0, 5, 2).is_err());
    }
}
