//! Truncation and solver settings.

use std::path::Path;
use serde::Deserialize;
use crate::{
    diag::{ Diagonalize, Lapack },
    error::{ Error, Result, config_err },
    hamiltonian::TransmonParams,
};

/// Default maximum total excitation number.
pub const DEFAULT_M: usize = 20;

/// Default charge-basis half-width.
pub const DEFAULT_C: usize = 30;

/// Where sector Hamiltonians are diagonalized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// LAPACK on the host.
    #[default]
    Host,
    /// An offloaded eigensolver.
    ///
    /// No implementation is bundled; selecting this backend through
    /// [`SolverConfig::solver`] fails with [`Error::AcceleratorUnavailable`].
    Accelerator,
}

/// Settings for a single Hamiltonian build and diagonalization.
///
/// Can be deserialized from TOML, e.g.
/// ```toml
/// m = 16
/// c = 50
/// backend = "host"
/// parallel = true
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Maximum total excitation number `M` kept in the truncated space. Each
    /// transmon keeps `M + 1` levels.
    pub m: usize,
    /// Half-width `C` of the single-transmon charge basis `-C..=C`.
    pub c: usize,
    /// Diagonalization backend.
    pub backend: Backend,
    /// Diagonalize the even and odd sectors concurrently.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            m: DEFAULT_M,
            c: DEFAULT_C,
            backend: Backend::Host,
            parallel: true,
        }
    }
}

impl SolverConfig {
    /// Create a new config with the given truncation and default backend.
    pub fn new(m: usize, c: usize) -> Self {
        Self { m, c, ..Self::default() }
    }

    /// Number of levels kept per transmon.
    pub fn levels(&self) -> usize { self.m + 1 }

    /// Dimension of the single-transmon charge basis.
    pub fn charge_dim(&self) -> usize { 2 * self.c + 1 }

    /// Check that the charge basis can support `M + 1` levels.
    pub fn validate(&self) -> Result<()> {
        if self.levels() > self.charge_dim() {
            config_err!(
                "charge basis of half-width {} has {} states; cannot keep {} levels",
                self.c, self.charge_dim(), self.levels(),
            );
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn load<P>(path: P) -> Result<Self>
    where P: AsRef<Path>
    {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolve [`Self::backend`] to a diagonalizer.
    pub fn solver(&self) -> Result<Box<dyn Diagonalize>> {
        match self.backend {
            Backend::Host => Ok(Box::new(Lapack)),
            Backend::Accelerator => Err(Error::AcceleratorUnavailable),
        }
    }
}

/// A parameter set together with the settings to solve it with.
///
/// ```toml
/// [params]
/// ec = [1.0, 1.0, 1.0, 1.0, 1.0]
/// ej = [50.0, 50.0, 50.0, 50.0, 50.0]
/// couplings = { e12 = 0.1, e23 = 0.1, e13 = 0.01 }
///
/// [solver]
/// m = 12
/// ```
/// Omitted couplings are zero; omitted solver settings take their defaults.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    pub params: TransmonParams,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Problem {
    /// Parse and validate a problem from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let problem: Self = toml::from_str(s)?;
        problem.solver.validate()?;
        Ok(problem)
    }

    /// Read, parse, and validate a TOML problem file.
    pub fn load<P>(path: P) -> Result<Self>
    where P: AsRef<Path>
    {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
