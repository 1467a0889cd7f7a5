#![allow(non_snake_case)]

//! Spectra of five capacitively coupled transmons in an excitation-truncated,
//! parity-split product basis.
//!
//! The single-transmon spectra are computed exactly in the charge basis; the
//! coupled Hamiltonian keeps only product states with at most `M` total
//! excitations and is assembled sector by sector without forming the full
//! Kronecker products. See [`hamiltonian::HBuilderFive`] for the main entry
//! point.

pub mod error;
pub mod config;
pub mod nd_utils;
pub mod transmon;
pub mod hilbert;
pub mod kron;
pub mod cache;
pub mod hamiltonian;
pub mod diag;
pub mod convergence;

pub use error::{ Error, Result };
pub use config::{ Backend, Problem, SolverConfig };
pub use hamiltonian::{ Couplings, HBuilderFive, TransmonParams, eigensystem, eigenvalues };
pub use diag::{ Diagonalize, Lapack, SectorSpectrum, Spectrum };
