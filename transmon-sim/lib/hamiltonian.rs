//! Hamiltonian builder for five capacitively coupled transmons.
//!
//! The Hamiltonian is
//! ```math
//! H = \sum_{k=1}^5 H_k + \sum_{(i, j)} 4 E_{ij} n_i n_j
//! ```
//! where each `H_k` is diagonal in the product of single-transmon eigenbases
//! and the sum runs over the pairs 12, 23, 13, 34, 45, 35. Each coupling
//! changes the total excitation number by an even amount (the charge operator
//! only connects levels of opposite parity), so the truncated Hamiltonian splits
//! into independent even and odd blocks.

use std::sync::Arc;
use log::debug;
use ndarray as nd;
use serde::Deserialize;
use crate::{
    cache::{ Truncation, TruncationCache },
    config::SolverConfig,
    diag::{ self, Diagonalize, Spectrum },
    error::{ Error, Result, config_err },
    hilbert::{ NUM_TRANSMONS, Parity },
    transmon::{ Transmon, TransmonSpectrum },
};

/// Number of free parameters: five charging energies, five Josephson energies,
/// and six couplings.
pub const NUM_PARAMS: usize = 16;

/// Pairwise coupling strengths.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Couplings {
    pub e12: f64,
    pub e23: f64,
    pub e13: f64,
    pub e34: f64,
    pub e45: f64,
    pub e35: f64,
}

impl Couplings {
    /// Zero-based transmon index pairs, in the order the couplings are listed.
    pub const PAIRS: [(usize, usize); 6]
        = [(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (2, 4)];

    /// All couplings set to zero.
    pub fn zero() -> Self { Self::default() }

    /// Coupling strengths in the order 12, 23, 13, 34, 45, 35.
    pub fn values(&self) -> [f64; 6] {
        [self.e12, self.e23, self.e13, self.e34, self.e45, self.e35]
    }

    /// Create from strengths in the order 12, 23, 13, 34, 45, 35.
    pub fn from_values(values: [f64; 6]) -> Self {
        let [e12, e23, e13, e34, e45, e35] = values;
        Self { e12, e23, e13, e34, e45, e35 }
    }

    /// Pair each coupling strength with its transmon indices.
    pub fn pairs(&self) -> [((usize, usize), f64); 6] {
        let values = self.values();
        std::array::from_fn(|k| (Self::PAIRS[k], values[k]))
    }
}

/// Full parameter set of the five-transmon system.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransmonParams {
    /// Charging energies.
    pub ec: [f64; NUM_TRANSMONS],
    /// Josephson energies.
    pub ej: [f64; NUM_TRANSMONS],
    #[serde(default)]
    pub couplings: Couplings,
}

impl TransmonParams {
    /// Five identical transmons with the given couplings.
    pub fn identical(ec: f64, ej: f64, couplings: Couplings) -> Self {
        Self { ec: [ec; NUM_TRANSMONS], ej: [ej; NUM_TRANSMONS], couplings }
    }

    /// Create from a flat parameter vector ordered as
    /// `Ec1..Ec5, Ej1..Ej5, E12, E23, E13, E34, E45, E35`.
    pub fn from_slice(p: &[f64]) -> Result<Self> {
        if p.len() != NUM_PARAMS {
            config_err!(
                "expected {} parameters, got {}", NUM_PARAMS, p.len());
        }
        let mut ec = [0.0; NUM_TRANSMONS];
        let mut ej = [0.0; NUM_TRANSMONS];
        let mut e = [0.0; 6];
        ec.copy_from_slice(&p[0..5]);
        ej.copy_from_slice(&p[5..10]);
        e.copy_from_slice(&p[10..16]);
        Ok(Self { ec, ej, couplings: Couplings::from_values(e) })
    }

    /// Flatten into the order accepted by [`Self::from_slice`].
    pub fn to_array(&self) -> [f64; NUM_PARAMS] {
        let mut p = [0.0; NUM_PARAMS];
        p[0..5].copy_from_slice(&self.ec);
        p[5..10].copy_from_slice(&self.ej);
        p[10..16].copy_from_slice(&self.couplings.values());
        p
    }

    /// Single-transmon parameters.
    pub fn transmons(&self) -> [Transmon; NUM_TRANSMONS] {
        std::array::from_fn(|k| Transmon::new(self.ec[k], self.ej[k]))
    }
}

fn check_inputs(
    levels: usize,
    energies: &[nd::ArrayView1<'_, f64>; NUM_TRANSMONS],
    operators: &[nd::ArrayView2<'_, f64>; NUM_TRANSMONS],
) -> Result<()>
{
    for (k, (e, op)) in energies.iter().zip(operators).enumerate() {
        if e.len() < levels {
            config_err!(
                "transmon {} has {} energies; need at least {}",
                k + 1, e.len(), levels,
            );
        }
        if op.dim() != (levels, levels) {
            config_err!(
                "transmon {} operator has shape {:?}; expected ({n}, {n})",
                k + 1, op.dim(), n = levels,
            );
        }
    }
    Ok(())
}

/// Assemble the Hamiltonian of a single parity sector of `truncation`.
///
/// The diagonal holds the sum of single-transmon energies of each product
/// state; each coupling `E_ij` adds `4 E_ij (n_i ⊗ n_j)` with identities on the
/// remaining transmons.
pub fn assemble_sector(
    truncation: &Truncation,
    parity: Parity,
    energies: &[nd::ArrayView1<'_, f64>; NUM_TRANSMONS],
    operators: &[nd::ArrayView2<'_, f64>; NUM_TRANSMONS],
    couplings: &Couplings,
) -> Result<nd::Array2<f64>>
{
    let levels = truncation.m() + 1;
    check_inputs(levels, energies, operators)?;
    let sector = truncation.sector(parity);
    let gather = truncation.gather(parity);
    if gather.len() != sector.len() || gather.levels() != levels {
        return Err(Error::Invariant(format!(
            "{:?} sector has {} states but {} gather rows",
            parity, sector.len(), gather.len(),
        )));
    }

    let diag: nd::Array1<f64>
        = sector.iter()
        .map(|state| {
            state.iter().zip(energies.iter())
                .map(|(d, e)| e[*d])
                .sum::<f64>()
        })
        .collect();
    let mut H: nd::Array2<f64> = nd::Array2::from_diag(&diag);

    let id: nd::Array2<f64> = nd::Array2::eye(levels);
    for ((i, j), e_ij) in couplings.pairs() {
        if e_ij == 0.0 { continue; }
        let mut ops = [id.view(); NUM_TRANSMONS];
        ops[i] = operators[i].reborrow();
        ops[j] = operators[j].reborrow();
        H.scaled_add(4.0 * e_ij, &gather.kron(ops)?);
    }
    Ok(H)
}

/// Assemble the even and odd sector Hamiltonians for truncation `m` from
/// single-transmon energies and charge operators (each `(m + 1) x (m + 1)`).
pub fn assemble(
    energies: [nd::ArrayView1<'_, f64>; NUM_TRANSMONS],
    operators: [nd::ArrayView2<'_, f64>; NUM_TRANSMONS],
    couplings: &Couplings,
    m: usize,
) -> Result<(nd::Array2<f64>, nd::Array2<f64>)>
{
    let truncation = TruncationCache::global().get(m);
    truncation.check(m)?;
    let H_even
        = assemble_sector(
            &truncation, Parity::Even, &energies, &operators, couplings)?;
    let H_odd
        = assemble_sector(
            &truncation, Parity::Odd, &energies, &operators, couplings)?;
    Ok((H_even, H_odd))
}

/// Hamiltonian builder for five coupled transmons under an excitation-number
/// truncation.
#[derive(Clone, Debug)]
pub struct HBuilderFive {
    params: TransmonParams,
    config: SolverConfig,
    transmons: [TransmonSpectrum; NUM_TRANSMONS],
    truncation: Arc<Truncation>,
}

impl HBuilderFive {
    /// Create a new `HBuilderFive`, solving all single-transmon spectra and
    /// fetching the truncation from the process-wide cache.
    pub fn new(params: TransmonParams, config: SolverConfig) -> Result<Self> {
        Self::with_cache(params, config, TruncationCache::global())
    }

    /// Like [`Self::new`], but drawing from a specific cache.
    pub fn with_cache(
        params: TransmonParams,
        config: SolverConfig,
        cache: &TruncationCache,
    ) -> Result<Self>
    {
        config.validate()?;
        let levels = config.levels();
        let [t1, t2, t3, t4, t5]
            = params.transmons()
            .map(|t| t.solve(config.c, levels));
        let transmons = [t1?, t2?, t3?, t4?, t5?];
        let truncation = cache.get(config.m);
        truncation.check(config.m)?;
        debug!(
            "built five-transmon system with M = {}, C = {}",
            config.m, config.c,
        );
        Ok(Self { params, config, transmons, truncation })
    }

    /// Return the model parameters.
    pub fn params(&self) -> &TransmonParams { &self.params }

    /// Return the solver settings.
    pub fn config(&self) -> &SolverConfig { &self.config }

    /// Return the truncated single-transmon spectra.
    pub fn transmons(&self) -> &[TransmonSpectrum; NUM_TRANSMONS] {
        &self.transmons
    }

    /// Return the sector maps and gather indices in use.
    pub fn truncation(&self) -> &Arc<Truncation> { &self.truncation }

    /// Compute the Hamiltonian of a single parity sector.
    pub fn gen_sector(&self, parity: Parity) -> Result<nd::Array2<f64>> {
        let energies = self.transmons.each_ref().map(|t| t.energies.view());
        let operators = self.transmons.each_ref().map(|t| t.charge.view());
        assemble_sector(
            &self.truncation,
            parity,
            &energies,
            &operators,
            &self.params.couplings,
        )
    }

    /// Compute the even and odd sector Hamiltonians.
    pub fn gen_sectors(&self) -> Result<(nd::Array2<f64>, nd::Array2<f64>)> {
        Ok((self.gen_sector(Parity::Even)?, self.gen_sector(Parity::Odd)?))
    }

    /// Compute all eigenvalues in ascending order with a given solver.
    pub fn eigenvalues_with(&self, solver: &dyn Diagonalize)
        -> Result<nd::Array1<f64>>
    {
        let (H_even, H_odd) = self.gen_sectors()?;
        diag::eigenvalues(solver, H_even, H_odd, self.config.parallel)
    }

    /// Compute all eigenvalues in ascending order with the configured
    /// backend.
    pub fn eigenvalues(&self) -> Result<nd::Array1<f64>> {
        let solver = self.config.solver()?;
        self.eigenvalues_with(solver.as_ref())
    }

    /// Diagonalize both sectors with a given solver, keeping eigenvectors.
    pub fn diagonalize_with(&self, solver: &dyn Diagonalize)
        -> Result<Spectrum>
    {
        let (H_even, H_odd) = self.gen_sectors()?;
        diag::eigensystem(
            solver,
            Arc::clone(&self.truncation),
            H_even,
            H_odd,
            self.config.parallel,
        )
    }

    /// Diagonalize both sectors with the configured backend, keeping
    /// eigenvectors.
    pub fn diagonalize(&self) -> Result<Spectrum> {
        let solver = self.config.solver()?;
        self.diagonalize_with(solver.as_ref())
    }

    /// Diagonalize and return a ground state of the system with its sector.
    ///
    /// Note that, in general, there may be more than one state that minimizes
    /// the energy of the system; this method offers no guarantees about which
    /// ground state is returned.
    pub fn ground_state(&self) -> Result<(f64, Parity, nd::Array1<f64>)> {
        let spectrum = self.diagonalize()?;
        let ground
            = [&spectrum.even, &spectrum.odd].into_iter()
            .filter_map(|sec| {
                sec.energies.get(0).zip(sec.vector(0))
                    .map(|(e, v)| (*e, sec.parity, v.to_owned()))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));
        match ground {
            Some(g) => Ok(g),
            None => config_err!("no states in the truncated space"),
        }
    }
}

/// Compute the merged, ascending spectrum of a five-transmon system.
pub fn eigenvalues(params: &TransmonParams, config: &SolverConfig)
    -> Result<nd::Array1<f64>>
{
    HBuilderFive::new(*params, *config)?.eigenvalues()
}

/// Compute per-sector eigenvalues, eigenvectors, and state maps of a
/// five-transmon system.
pub fn eigensystem(params: &TransmonParams, config: &SolverConfig)
    -> Result<Spectrum>
{
    HBuilderFive::new(*params, *config)?.diagonalize()
}
