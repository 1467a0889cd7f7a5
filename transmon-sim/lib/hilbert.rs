//! Definitions to describe five-transmon product states and the
//! excitation-truncated, parity-split bases built from them.

use std::ops::Deref;
use indexmap::IndexSet;

/// Number of transmons in the system.
pub const NUM_TRANSMONS: usize = 5;

/* States *********************************************************************/

/// Even or odd total excitation number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity of an excitation number.
    pub fn of(n: usize) -> Self {
        if n % 2 == 0 { Self::Even } else { Self::Odd }
    }
}

/// A product state labeled by the excitation number of each transmon.
///
/// Transmon 1 is the first entry, and the most significant digit in the
/// [flattened][Self::flatten] representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Excitations(pub [usize; NUM_TRANSMONS]);

impl Deref for Excitations {
    type Target = [usize; NUM_TRANSMONS];

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl From<[usize; NUM_TRANSMONS]> for Excitations {
    fn from(digits: [usize; NUM_TRANSMONS]) -> Self { Self(digits) }
}

impl From<Excitations> for [usize; NUM_TRANSMONS] {
    fn from(state: Excitations) -> Self { state.0 }
}

impl Excitations {
    /// Total number of excitations.
    pub fn total(&self) -> usize { self.0.iter().sum() }

    /// Parity of the total number of excitations.
    pub fn parity(&self) -> Parity { Parity::of(self.total()) }

    /// Encode as a mixed-radix integer in base `n`, first transmon most
    /// significant.
    ///
    /// Every digit must be less than `n`.
    pub fn flatten(&self, n: usize) -> usize {
        self.0.iter().fold(0, |acc, d| acc * n + d)
    }

    /// Decode a mixed-radix integer in base `n`; inverse of [`Self::flatten`].
    pub fn unflatten(mut flat: usize, n: usize) -> Self {
        let mut digits = [0; NUM_TRANSMONS];
        for d in digits.iter_mut().rev() {
            *d = flat % n;
            flat /= n;
        }
        Self(digits)
    }
}

/* Sectors ********************************************************************/

/// All states of one parity with at most `M` total excitations.
///
/// The position of a state in the backing [`IndexSet`] is its row/column in
/// the sector's Hamiltonian.
#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    parity: Parity,
    levels: usize,
    states: IndexSet<Excitations>,
    flat: Vec<usize>,
}

impl Sector {
    fn new(parity: Parity, levels: usize) -> Self {
        Self { parity, levels, states: IndexSet::new(), flat: Vec::new() }
    }

    fn push(&mut self, state: Excitations, flat: usize) {
        self.states.insert(state);
        self.flat.push(flat);
    }

    /// Parity of all states in the sector.
    pub fn parity(&self) -> Parity { self.parity }

    /// Number of levels `N = M + 1` per transmon.
    pub fn levels(&self) -> usize { self.levels }

    /// Number of states in the sector.
    pub fn len(&self) -> usize { self.states.len() }

    /// Return `true` if the sector has no states.
    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    /// Get the state at a sector index.
    pub fn state(&self, index: usize) -> Option<&Excitations> {
        self.states.get_index(index)
    }

    /// Get the sector index of a state.
    pub fn index_of(&self, state: &Excitations) -> Option<usize> {
        self.states.get_index_of(state)
    }

    /// Flattened indices of all states in sector order.
    pub fn flat_indices(&self) -> &[usize] { &self.flat }

    /// Iterate over states in sector order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, Excitations> {
        self.states.iter()
    }
}

impl<'a> IntoIterator for &'a Sector {
    type Item = &'a Excitations;
    type IntoIter = indexmap::set::Iter<'a, Excitations>;

    fn into_iter(self) -> Self::IntoIter { self.states.iter() }
}

/// Even and odd [`Sector`]s for a single truncation `M`.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorMaps {
    pub m: usize,
    pub even: Sector,
    pub odd: Sector,
}

impl SectorMaps {
    /// Get the sector of a given parity.
    pub fn sector(&self, parity: Parity) -> &Sector {
        match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        }
    }

    /// Total number of kept states.
    pub fn num_states(&self) -> usize { self.even.len() + self.odd.len() }

    /// Locate a state by its parity sector and index therein.
    pub fn locate(&self, state: &Excitations) -> Option<(Parity, usize)> {
        let parity = state.parity();
        self.sector(parity).index_of(state).map(|k| (parity, k))
    }
}

/// Enumerate all five-transmon states with at most `m` total excitations,
/// split by parity.
///
/// States are visited in lexicographic order over `{0, ..., m}^5` and numbered
/// within their sector in the order visited, so repeated calls produce
/// identical maps.
pub fn enumerate_sectors(m: usize) -> SectorMaps {
    let n = m + 1;
    let mut even = Sector::new(Parity::Even, n);
    let mut odd = Sector::new(Parity::Odd, n);
    // counting up through flattened indices visits digit tuples in
    // lexicographic order
    for flat in 0..n.pow(NUM_TRANSMONS as u32) {
        let state = Excitations::unflatten(flat, n);
        if state.total() > m { continue; }
        match state.parity() {
            Parity::Even => even.push(state, flat),
            Parity::Odd => odd.push(state, flat),
        }
    }
    SectorMaps { m, even, odd }
}

/// Number of five-transmon states with at most `m` total excitations, i.e.
/// `binom(m + 5, 5)`.
pub fn num_truncated_states(m: usize) -> usize {
    (1..=NUM_TRANSMONS).fold(1, |acc, k| acc * (m + k) / k)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use super::*;

    fn brute_count(m: usize) -> usize {
        (0..NUM_TRANSMONS).map(|_| 0..=m)
            .multi_cartesian_product()
            .filter(|d| d.iter().sum::<usize>() <= m)
            .count()
    }

    #[test]
    fn counts() {
        for m in 0..=6 {
            let maps = enumerate_sectors(m);
            assert_eq!(maps.num_states(), brute_count(m));
            assert_eq!(maps.num_states(), num_truncated_states(m));
        }
    }

    #[test]
    fn ground_only() {
        let maps = enumerate_sectors(0);
        assert_eq!(maps.even.len(), 1);
        assert!(maps.odd.is_empty());
        assert_eq!(maps.even.state(0), Some(&Excitations([0; 5])));
        assert_eq!(maps.even.flat_indices(), &[0]);
    }

    #[test]
    fn bijective() {
        let maps = enumerate_sectors(4);
        for sector in [&maps.even, &maps.odd] {
            for (k, state) in sector.iter().enumerate() {
                assert_eq!(sector.index_of(state), Some(k));
                assert_eq!(state.parity(), sector.parity());
                assert!(state.total() <= 4);
            }
            assert!(sector.state(sector.len()).is_none());
        }
    }

    #[test]
    fn lexicographic_order() {
        let maps = enumerate_sectors(3);
        assert_eq!(maps.odd.state(0), Some(&Excitations([0, 0, 0, 0, 1])));
        assert_eq!(maps.odd.state(1), Some(&Excitations([0, 0, 0, 0, 3])));
        assert_eq!(maps.even.state(1), Some(&Excitations([0, 0, 0, 0, 2])));
        for sector in [&maps.even, &maps.odd] {
            assert!(sector.flat_indices().windows(2).all(|w| w[0] < w[1]));
            let states: Vec<&Excitations> = sector.iter().collect();
            assert!(states.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn flatten_round_trip() {
        let m = 5;
        let maps = enumerate_sectors(m);
        for sector in [&maps.even, &maps.odd] {
            for (state, flat) in sector.iter().zip(sector.flat_indices()) {
                assert_eq!(state.flatten(m + 1), *flat);
                assert_eq!(Excitations::unflatten(*flat, m + 1), *state);
            }
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(enumerate_sectors(5), enumerate_sectors(5));
    }

    #[test]
    fn locate() {
        let maps = enumerate_sectors(2);
        assert_eq!(
            maps.locate(&Excitations([1, 0, 0, 0, 0])).map(|(p, _)| p),
            Some(Parity::Odd),
        );
        assert_eq!(maps.locate(&Excitations([1, 1, 1, 0, 0])), None);
    }
}
