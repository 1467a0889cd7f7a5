//! Memoization of everything that depends only on the truncation `M`.
//!
//! A [`Truncation`] bundles both sector maps with their gather indices, so the
//! two can never be built for different values of `M`.

use std::sync::{ Arc, RwLock };
use log::debug;
use once_cell::sync::{ Lazy, OnceCell };
use rustc_hash::FxHashMap as HashMap;
use crate::{
    error::{ Error, Result },
    hilbert::{ Parity, Sector, SectorMaps, enumerate_sectors },
    kron::GatherIndices,
};

/// Sector maps and gather indices for a single truncation `M`.
#[derive(Clone, Debug, PartialEq)]
pub struct Truncation {
    pub maps: SectorMaps,
    pub even: GatherIndices,
    pub odd: GatherIndices,
}

impl Truncation {
    /// Enumerate sectors and decode gather indices for truncation `m`.
    pub fn build(m: usize) -> Self {
        let maps = enumerate_sectors(m);
        let even = GatherIndices::from_sector(&maps.even);
        let odd = GatherIndices::from_sector(&maps.odd);
        Self { maps, even, odd }
    }

    /// Maximum total excitation number.
    pub fn m(&self) -> usize { self.maps.m }

    /// Get the sector map of a given parity.
    pub fn sector(&self, parity: Parity) -> &Sector {
        self.maps.sector(parity)
    }

    /// Get the gather indices of a given parity.
    pub fn gather(&self, parity: Parity) -> &GatherIndices {
        match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        }
    }

    /// Check that `self` was built for truncation `m` and that its maps and
    /// gather indices agree.
    pub fn check(&self, m: usize) -> Result<()> {
        let consistent
            = self.maps.m == m
            && self.even.levels() == m + 1
            && self.odd.levels() == m + 1
            && self.even.len() == self.maps.even.len()
            && self.odd.len() == self.maps.odd.len();
        if consistent {
            Ok(())
        } else {
            Err(Error::Invariant(format!(
                "truncation built for M = {} used for M = {}", self.maps.m, m)))
        }
    }
}

type Slot = Arc<OnceCell<Arc<Truncation>>>;

/// Get-or-build store of [`Truncation`]s keyed by `M`.
///
/// Entries are built at most once per key, even under concurrent first use;
/// builds for different keys do not block each other. Entries are never
/// evicted.
#[derive(Debug, Default)]
pub struct TruncationCache {
    slots: RwLock<HashMap<usize, Slot>>,
}

static GLOBAL: Lazy<TruncationCache> = Lazy::new(TruncationCache::new);

impl TruncationCache {
    /// Create a new, empty cache.
    pub fn new() -> Self { Self::default() }

    /// The process-wide cache.
    pub fn global() -> &'static Self { &GLOBAL }

    fn slot(&self, m: usize) -> Slot {
        // a poisoned lock only means another thread panicked while inserting
        // an empty slot; the map itself is still valid
        if let Some(slot)
            = self.slots.read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&m)
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(m).or_default())
    }

    /// Get the truncation for `m`, building it if necessary.
    pub fn get(&self, m: usize) -> Arc<Truncation> {
        let slot = self.slot(m);
        Arc::clone(slot.get_or_init(|| {
            debug!("building sector maps and gather indices for M = {}", m);
            let truncation = Truncation::build(m);
            debug!(
                "M = {}: {} even states, {} odd states",
                m, truncation.maps.even.len(), truncation.maps.odd.len(),
            );
            Arc::new(truncation)
        }))
    }

    /// Return `true` if the truncation for `m` has already been built.
    pub fn contains(&self, m: usize) -> bool {
        self.slots.read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&m)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of built truncations.
    pub fn len(&self) -> usize {
        self.slots.read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Return `true` if no truncations have been built.
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_build() {
        let cache = TruncationCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains(3));
        let a = cache.get(3);
        assert!(cache.contains(3));
        let b = cache.get(3);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(a.check(3).is_ok());
        assert!(matches!(a.check(4), Err(Error::Invariant(_))));
    }

    #[test]
    fn rebuild_is_identical() {
        let cache = TruncationCache::new();
        let cached = cache.get(4);
        assert_eq!(*cached, Truncation::build(4));
    }

    #[test]
    fn concurrent_first_use() {
        let cache = TruncationCache::new();
        let results: Vec<Arc<Truncation>>
            = std::thread::scope(|scope| {
                let handles: Vec<_>
                    = (0..8).map(|_| scope.spawn(|| cache.get(5))).collect();
                handles.into_iter()
                    .map(|h| h.join().unwrap())
                    .collect()
            });
        assert!(results.iter().all(|t| Arc::ptr_eq(t, &results[0])));
        assert_eq!(cache.len(), 1);
    }
}
