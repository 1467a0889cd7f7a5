//! Sector-restricted Kronecker products of five single-transmon operators.
//!
//! The full product of five `N x N` matrices has `N^10` elements, nearly all of
//! which are discarded by the excitation truncation. Instead, each kept state
//! is decoded into its per-transmon digits once, and every element of the
//! restricted product is computed directly as
//! ```text
//! out[r, s] = A[a_r, a_s] * B[b_r, b_s] * C[c_r, c_s] * D[d_r, d_s] * E[e_r, e_s]
//! ```
//! where `(a, b, c, d, e)_r` are the digits of the `r`-th state in the sector.

use std::sync::Arc;
use ndarray as nd;
use crate::{
    cache::{ Truncation, TruncationCache },
    error::{ Result, config_err },
    hilbert::{ Excitations, NUM_TRANSMONS, Parity, Sector },
};

/// Per-transmon digit arrays for all states of a sector, used to gather
/// single-transmon matrix elements.
#[derive(Clone, Debug, PartialEq)]
pub struct GatherIndices {
    levels: usize,
    digits: [nd::Array1<usize>; NUM_TRANSMONS],
}

impl GatherIndices {
    /// Decode an ordered list of flattened indices in base `levels`.
    pub fn from_flat(levels: usize, flat: &[usize]) -> Self {
        let mut digits: [Vec<usize>; NUM_TRANSMONS] = Default::default();
        for f in flat.iter() {
            let state = Excitations::unflatten(*f, levels);
            digits.iter_mut().zip(state.iter())
                .for_each(|(dk, d)| dk.push(*d));
        }
        Self { levels, digits: digits.map(nd::Array1::from_vec) }
    }

    /// Build gather indices for all states of a sector, in sector order.
    pub fn from_sector(sector: &Sector) -> Self {
        Self::from_flat(sector.levels(), sector.flat_indices())
    }

    /// Number of levels per transmon.
    pub fn levels(&self) -> usize { self.levels }

    /// Number of states covered.
    pub fn len(&self) -> usize { self.digits[0].len() }

    /// Return `true` if no states are covered.
    pub fn is_empty(&self) -> bool { self.digits[0].is_empty() }

    /// Digits of the `k`-th transmon for every state.
    pub fn digits(&self, k: usize) -> nd::ArrayView1<'_, usize> {
        self.digits[k].view()
    }

    /// Row indices into the `k`-th transmon's operator, as a square grid with
    /// constant rows.
    pub fn row_grid(&self, k: usize) -> nd::ArrayView2<'_, usize> {
        let n = self.len();
        self.digits[k]
            .broadcast((n, n))
            .expect("column vector always broadcasts to a square")
            .reversed_axes()
    }

    /// Column indices into the `k`-th transmon's operator, as a square grid
    /// with constant columns.
    pub fn col_grid(&self, k: usize) -> nd::ArrayView2<'_, usize> {
        let n = self.len();
        self.digits[k]
            .broadcast((n, n))
            .expect("row vector always broadcasts to a square")
    }

    /// Compute the Kronecker product of five `N x N` matrices restricted to
    /// the covered states.
    pub fn kron(&self, ops: [nd::ArrayView2<'_, f64>; NUM_TRANSMONS])
        -> Result<nd::Array2<f64>>
    {
        for (k, op) in ops.iter().enumerate() {
            if op.dim() != (self.levels, self.levels) {
                config_err!(
                    "operator {} has shape {:?}; expected ({n}, {n})",
                    k + 1, op.dim(), n = self.levels,
                );
            }
        }
        let n = self.len();
        let mut out: nd::Array2<f64> = nd::Array2::zeros((n, n));
        nd::Zip::indexed(&mut out)
            .par_for_each(|(r, s), x| {
                *x = ops.iter().zip(self.digits.iter())
                    .map(|(op, d)| op[[d[r], d[s]]])
                    .product();
            });
        Ok(out)
    }
}

/// Sector-restricted Kronecker product for one parity sector of a cached
/// truncation.
#[derive(Clone, Debug)]
pub struct SectorKron {
    truncation: Arc<Truncation>,
    parity: Parity,
}

impl SectorKron {
    /// Create a new `SectorKron` over a sector of `truncation`.
    pub fn new(truncation: Arc<Truncation>, parity: Parity) -> Self {
        Self { truncation, parity }
    }

    /// Parity of the covered sector.
    pub fn parity(&self) -> Parity { self.parity }

    /// Sector-restricted Kronecker product; see [`GatherIndices::kron`].
    pub fn build(&self, ops: [nd::ArrayView2<'_, f64>; NUM_TRANSMONS])
        -> Result<nd::Array2<f64>>
    {
        self.truncation.gather(self.parity).kron(ops)
    }

    /// The truncation this builder draws from.
    pub fn truncation(&self) -> &Arc<Truncation> { &self.truncation }
}

/// Get even and odd sector-restricted Kronecker products for truncation `m`
/// from the process-wide cache.
pub fn kron_sectors(m: usize) -> (SectorKron, SectorKron) {
    let truncation = TruncationCache::global().get(m);
    (
        SectorKron::new(Arc::clone(&truncation), Parity::Even),
        SectorKron::new(truncation, Parity::Odd),
    )
}
