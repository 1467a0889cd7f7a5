//! End-to-end checks of the five-transmon spectrum.

#![allow(non_snake_case)]

use approx::assert_relative_eq;
use itertools::Itertools;
use transmon_sim::{
    Couplings,
    HBuilderFive,
    Lapack,
    SolverConfig,
    TransmonParams,
    convergence,
    eigensystem,
    eigenvalues,
    hilbert::{ Excitations, Parity },
    transmon::solve_transmon,
};

fn config(m: usize, c: usize) -> SolverConfig {
    SolverConfig { parallel: false, ..SolverConfig::new(m, c) }
}

#[test]
fn uncoupled_limit() {
    let (m, c) = (4, 20);
    let params = TransmonParams::identical(1.0, 50.0, Couplings::zero());
    let values = eigenvalues(&params, &config(m, c)).unwrap();

    let single = solve_transmon(1.0, 50.0, c, m + 1).unwrap().energies;
    let expected: Vec<f64>
        = (0..5).map(|_| 0..=m)
        .multi_cartesian_product()
        .filter(|d| d.iter().sum::<usize>() <= m)
        .map(|d| d.iter().map(|k| single[*k]).sum::<f64>())
        .sorted_by(|a, b| a.total_cmp(b))
        .collect();
    assert_eq!(values.len(), expected.len());
    values.iter().zip(&expected)
        .for_each(|(v, x)| assert_relative_eq!(*v, *x, max_relative = 1e-10));
}

#[test]
fn ground_only_truncation() {
    let params = TransmonParams {
        ec: [1.0, 1.2, 0.9, 1.1, 1.0],
        ej: [50.0, 45.0, 55.0, 48.0, 52.0],
        couplings: Couplings::from_values([0.1, 0.1, 0.01, 0.1, 0.1, 0.01]),
    };
    let values = eigenvalues(&params, &config(0, 20)).unwrap();
    assert_eq!(values.len(), 1);
    let ground: f64
        = params.transmons().iter()
        .map(|t| t.solve(20, 1).unwrap().energies[0])
        .sum();
    assert_relative_eq!(values[0], ground, max_relative = 1e-12);

    let spectrum = eigensystem(&params, &config(0, 20)).unwrap();
    assert_eq!(spectrum.even.len(), 1);
    assert!(spectrum.odd.is_empty());
    assert_eq!(spectrum.even.state_of(0), Some(&Excitations([0; 5])));
}

#[test]
fn deterministic() {
    let params = TransmonParams::identical(
        1.0, 50.0, Couplings::from_values([0.1, 0.1, 0.01, 0.1, 0.1, 0.01]));
    let a = eigenvalues(&params, &config(3, 15)).unwrap();
    let b = eigenvalues(&params, &config(3, 15)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn eigensystem_matches_eigenvalues() {
    let params = TransmonParams::identical(
        1.0, 50.0, Couplings::from_values([0.2, 0.2, 0.02, 0.2, 0.2, 0.02]));
    let cfg = config(3, 15);
    let values = eigenvalues(&params, &cfg).unwrap();
    let spectrum = eigensystem(&params, &cfg).unwrap();
    let merged = spectrum.merged_energies();
    values.iter().zip(merged.iter())
        .for_each(|(a, b)| assert_relative_eq!(*a, *b, max_relative = 1e-10));

    // weakly coupled: the ground state is mostly the bare ground state, and
    // the first excited states lie in the odd sector
    let (state, prob) = spectrum.even.dominant_state(0).unwrap();
    assert_eq!(*state, Excitations([0; 5]));
    assert!(prob > 0.99);
    let (state, _) = spectrum.odd.dominant_state(0).unwrap();
    assert_eq!(state.total(), 1);
    assert_eq!(state.parity(), Parity::Odd);
}

#[test]
fn eigenvectors_diagonalize_sectors() {
    let params = TransmonParams::identical(
        1.0, 40.0, Couplings::from_values([0.5, 0.5, 0.05, 0.5, 0.5, 0.05]));
    let builder = HBuilderFive::new(params, config(2, 15)).unwrap();
    let (H_even, _) = builder.gen_sectors().unwrap();
    let spectrum = builder.diagonalize_with(&Lapack).unwrap();
    for k in 0..spectrum.even.len() {
        let v = spectrum.even.vector(k).unwrap();
        let Hv = H_even.dot(&v);
        Hv.iter().zip(v.iter())
            .for_each(|(hv, vi)| {
                assert!((hv - spectrum.even.energies[k] * vi).abs() < 1e-8);
            });
    }
}

#[test]
fn convergence_with_m() {
    let points = [
        TransmonParams::identical(
            1.0, 50.0, Couplings::from_values([0.5; 6])),
        TransmonParams {
            ec: [1.0, 1.1, 0.9, 1.0, 1.2],
            ej: [50.0, 60.0, 45.0, 55.0, 48.0],
            couplings: Couplings::from_values([-0.4, 0.3, 0.1, 0.5, -0.2, 0.05]),
        },
    ];
    let ms = [1, 3, 5];
    let report
        = convergence::sweep(points.iter(), &ms, 15, 5, &Lapack).unwrap();
    assert_eq!(report.ms, ms.to_vec());
    let err = &report.max_rel_err;
    assert_eq!(err[2], 0.0);
    assert!(err[1] < err[0]);
}
