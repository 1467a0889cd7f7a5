//! Diagonalization of the parity-sector Hamiltonians.
//!
//! The even and odd sectors are independent blocks of the full Hamiltonian, so
//! the full spectrum is the union of the two sector spectra.

use std::sync::Arc;
use log::debug;
use ndarray::{ self as nd, s };
use ndarray_linalg::{ EigValshInto, EighInto, UPLO };
use crate::{
    cache::Truncation,
    error::Result,
    hilbert::{ Excitations, Parity, Sector },
};

/// A dense real-symmetric eigensolver.
///
/// Implementors must return eigenvalues in ascending order, with eigenvectors
/// as the columns of the returned matrix in the same order.
pub trait Diagonalize: Sync {
    /// Compute eigenvalues only.
    fn eigvalsh(&self, H: nd::Array2<f64>) -> Result<nd::Array1<f64>>;

    /// Compute eigenvalues and eigenvectors.
    fn eigh(&self, H: nd::Array2<f64>)
        -> Result<(nd::Array1<f64>, nd::Array2<f64>)>;
}

/// LAPACK on the host, via `ndarray-linalg`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Lapack;

impl Diagonalize for Lapack {
    fn eigvalsh(&self, H: nd::Array2<f64>) -> Result<nd::Array1<f64>> {
        if H.is_empty() { return Ok(nd::Array1::zeros(0)); }
        Ok(H.eigvalsh_into(UPLO::Lower)?)
    }

    fn eigh(&self, H: nd::Array2<f64>)
        -> Result<(nd::Array1<f64>, nd::Array2<f64>)>
    {
        if H.is_empty() {
            return Ok((nd::Array1::zeros(0), nd::Array2::zeros((0, 0))));
        }
        Ok(H.eigh_into(UPLO::Lower)?)
    }
}

/// Eigenvalues, eigenvectors, and the state map of a single parity sector.
#[derive(Clone, Debug)]
pub struct SectorSpectrum {
    pub parity: Parity,
    /// Eigenvalues in ascending order.
    pub energies: nd::Array1<f64>,
    /// Eigenvectors as columns, aligned with `energies`.
    pub vectors: nd::Array2<f64>,
    truncation: Arc<Truncation>,
}

impl SectorSpectrum {
    /// Sector map translating vector components into product states.
    pub fn sector(&self) -> &Sector { self.truncation.sector(self.parity) }

    /// Number of eigenstates.
    pub fn len(&self) -> usize { self.energies.len() }

    /// Return `true` if the sector is empty.
    pub fn is_empty(&self) -> bool { self.energies.is_empty() }

    /// Get the product state corresponding to a vector component.
    pub fn state_of(&self, component: usize) -> Option<&Excitations> {
        self.sector().state(component)
    }

    /// Get the `k`-th eigenvector.
    pub fn vector(&self, k: usize) -> Option<nd::ArrayView1<'_, f64>> {
        (k < self.len()).then(|| self.vectors.slice(s![.., k]))
    }

    /// Get the product state with the largest overlap with the `k`-th
    /// eigenvector, along with its probability.
    pub fn dominant_state(&self, k: usize) -> Option<(&Excitations, f64)> {
        let v = self.vector(k)?;
        let (component, amp)
            = v.iter().enumerate()
            .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))?;
        self.state_of(component).map(|state| (state, amp * amp))
    }
}

/// Even and odd [`SectorSpectrum`]s.
#[derive(Clone, Debug)]
pub struct Spectrum {
    pub even: SectorSpectrum,
    pub odd: SectorSpectrum,
}

impl Spectrum {
    /// Get the spectrum of a given parity sector.
    pub fn sector(&self, parity: Parity) -> &SectorSpectrum {
        match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        }
    }

    /// All eigenvalues from both sectors in ascending order.
    pub fn merged_energies(&self) -> nd::Array1<f64> {
        merge_sorted(&self.even.energies, &self.odd.energies)
    }

    /// Lowest eigenvalue across both sectors.
    pub fn ground_energy(&self) -> Option<f64> {
        self.merged_energies().get(0).copied()
    }
}

fn merge_sorted(a: &nd::Array1<f64>, b: &nd::Array1<f64>) -> nd::Array1<f64> {
    let mut all: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    all.sort_by(|x, y| x.total_cmp(y));
    nd::Array1::from_vec(all)
}

fn both<A, B, FA, FB>(parallel: bool, f_even: FA, f_odd: FB) -> (A, B)
where
    A: Send,
    B: Send,
    FA: FnOnce() -> A + Send,
    FB: FnOnce() -> B + Send,
{
    if parallel {
        rayon::join(f_even, f_odd)
    } else {
        (f_even(), f_odd())
    }
}

/// Diagonalize both sectors and return all eigenvalues, merged and sorted in
/// ascending order.
pub fn eigenvalues(
    solver: &dyn Diagonalize,
    H_even: nd::Array2<f64>,
    H_odd: nd::Array2<f64>,
    parallel: bool,
) -> Result<nd::Array1<f64>>
{
    debug!(
        "diagonalizing sectors of size {} and {}",
        H_even.nrows(), H_odd.nrows(),
    );
    let (E_even, E_odd)
        = both(
            parallel,
            || solver.eigvalsh(H_even),
            || solver.eigvalsh(H_odd),
        );
    Ok(merge_sorted(&E_even?, &E_odd?))
}

/// Diagonalize both sectors of `truncation`, keeping eigenvectors and the
/// sector maps needed to interpret them.
pub fn eigensystem(
    solver: &dyn Diagonalize,
    truncation: Arc<Truncation>,
    H_even: nd::Array2<f64>,
    H_odd: nd::Array2<f64>,
    parallel: bool,
) -> Result<Spectrum>
{
    debug!(
        "diagonalizing sectors of size {} and {} with eigenvectors",
        H_even.nrows(), H_odd.nrows(),
    );
    let (eig_even, eig_odd)
        = both(parallel, || solver.eigh(H_even), || solver.eigh(H_odd));
    let (E_even, V_even) = eig_even?;
    let (E_odd, V_odd) = eig_odd?;
    Ok(Spectrum {
        even: SectorSpectrum {
            parity: Parity::Even,
            energies: E_even,
            vectors: V_even,
            truncation: Arc::clone(&truncation),
        },
        odd: SectorSpectrum {
            parity: Parity::Odd,
            energies: E_odd,
            vectors: V_odd,
            truncation,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn merged_is_sorted_union() {
        let H_even = nd::Array2::from_diag(&nd::array![3.0, 1.0]);
        let H_odd = nd::Array2::from_diag(&nd::array![2.0, 0.5, 4.0]);
        for parallel in [false, true] {
            let E = eigenvalues(
                &Lapack, H_even.clone(), H_odd.clone(), parallel).unwrap();
            let expected = [0.5, 1.0, 2.0, 3.0, 4.0];
            assert_eq!(E.len(), 5);
            E.iter().zip(expected)
                .for_each(|(e, x)| assert_relative_eq!(*e, x, epsilon = 1e-12));
        }
    }

    #[test]
    fn empty_sector() {
        let E = Lapack.eigvalsh(nd::Array2::zeros((0, 0))).unwrap();
        assert!(E.is_empty());
        let (E, V) = Lapack.eigh(nd::Array2::zeros((0, 0))).unwrap();
        assert!(E.is_empty());
        assert_eq!(V.dim(), (0, 0));
    }

    #[test]
    fn eigenvectors_map_to_states() {
        let truncation = Arc::new(Truncation::build(1));
        // odd sector of M = 1 holds the five single-excitation states
        let n_odd = truncation.maps.odd.len();
        assert_eq!(n_odd, 5);
        let H_odd
            = nd::Array2::from_diag(
                &(0..n_odd).rev().map(|k| k as f64).collect::<nd::Array1<f64>>());
        let H_even = nd::Array2::from_diag(&nd::array![10.0]);
        let spec
            = eigensystem(&Lapack, truncation, H_even, H_odd, true).unwrap();
        assert_eq!(spec.even.len(), 1);
        assert_eq!(spec.odd.len(), 5);
        // lowest odd eigenvalue belongs to the last odd state, (1, 0, 0, 0, 0)
        let (state, prob) = spec.odd.dominant_state(0).unwrap();
        assert_eq!(*state, Excitations([1, 0, 0, 0, 0]));
        assert_relative_eq!(prob, 1.0, epsilon = 1e-12);
        assert_relative_eq!(spec.ground_energy().unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(spec.merged_energies().len(), 6);
    }
}
