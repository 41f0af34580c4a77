//! Truck arrivals: clustered parcel batches.

use crate::config::{BatchProfile, MAX_BATCH_SIZE};
use crate::error::{SimulationError, SimulationResult};
use crate::parcel::{Parcel, ParcelId};
use crate::random::RandomProvider;
use crate::variate::sample_positive_count;

/// Produces the parcel batch unloaded by each arriving truck.
///
/// A batch has a Gaussian size (at least one parcel). `floor(size * ratio)`
/// parcels go to one randomly chosen "hot" station, the rest to uniformly
/// random stations, and the whole batch is shuffled before it reaches the
/// belt. The shuffle decides which parcels are lost first when the belt
/// jams mid-batch.
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    profile: BatchProfile,
    next_id: u64,
}

impl ArrivalGenerator {
    /// Create a generator for the given batch shape.
    ///
    /// Fails if the profile has no station to route parcels to.
    pub fn new(profile: BatchProfile) -> SimulationResult<Self> {
        if profile.station_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "batch profile needs at least one station".to_string(),
            ));
        }
        Ok(Self {
            profile,
            next_id: 0,
        })
    }

    /// The batch shape this generator draws from.
    pub fn profile(&self) -> &BatchProfile {
        &self.profile
    }

    /// Number of parcels generated so far.
    pub fn parcels_generated(&self) -> u64 {
        self.next_id
    }

    /// Generate a fresh batch of parcels arriving at `current_tick`.
    ///
    /// Never returns an empty batch, nor one larger than [`MAX_BATCH_SIZE`].
    /// The draw order is: batch size, hot station, one destination per
    /// non-clustered parcel, then the shuffle.
    pub fn generate_batch<R: RandomProvider>(&mut self, rng: &R, current_tick: u64) -> Vec<Parcel> {
        let size = sample_positive_count(rng, self.profile.size_mean, self.profile.size_std_dev)
            .min(MAX_BATCH_SIZE) as usize;
        let hot_station = rng.random_range(0..self.profile.station_count);

        let clustered = (size as f64 * self.profile.cluster_ratio) as usize;
        let remainder = size - clustered.min(size);

        let mut batch = Vec::with_capacity(size);
        for _ in 0..clustered {
            let id = self.next_parcel_id();
            batch.push(Parcel::new(id, current_tick, hot_station));
        }
        for _ in 0..remainder {
            let id = self.next_parcel_id();
            let destination = rng.random_range(0..self.profile.station_count);
            batch.push(Parcel::new(id, current_tick, destination));
        }

        shuffle(rng, &mut batch);

        tracing::trace!(
            tick = current_tick,
            size,
            clustered,
            hot_station,
            "generated batch"
        );
        batch
    }

    fn next_parcel_id(&mut self) -> ParcelId {
        let id = ParcelId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Fisher–Yates shuffle, walking from the back of the slice.
fn shuffle<R: RandomProvider, T>(rng: &R, items: &mut [T]) {
    let mut n = items.len();
    while n > 1 {
        n -= 1;
        let k = rng.random_range(0..n + 1);
        items.swap(k, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;
    use crate::random::SimRandomProvider;
    use std::collections::HashSet;

    fn generator(profile: BatchProfile) -> ArrivalGenerator {
        ArrivalGenerator::new(profile).unwrap_or_else(|e| panic!("generator: {e}"))
    }

    fn profile(mean: f64, std_dev: f64, ratio: f64, stations: usize) -> BatchProfile {
        BatchProfile {
            size_mean: mean,
            size_std_dev: std_dev,
            cluster_ratio: ratio,
            station_count: stations,
        }
    }

    #[test]
    fn test_batch_never_empty() {
        let rng = SimRandomProvider::new(5);
        let mut generator = generator(profile(-50.0, 1.0, 0.7, 4));
        for tick in 0..50 {
            let batch = generator.generate_batch(&rng, tick);
            assert_eq!(batch.len(), 1);
        }
    }

    #[test]
    fn test_fixed_size_batch_composition() {
        let rng = SimRandomProvider::new(11);
        let mut generator = generator(profile(10.0, 0.0, 0.7, 20));
        let batch = generator.generate_batch(&rng, 3);

        assert_eq!(batch.len(), 10);
        assert!(batch.iter().all(|p| p.arrival_tick() == 3));
        assert!(batch.iter().all(|p| p.destination() < 20));

        // At least the seven clustered parcels share one destination.
        let mut counts = [0usize; 20];
        for parcel in &batch {
            counts[parcel.destination()] += 1;
        }
        assert!(counts.iter().copied().max().unwrap_or(0) >= 7);
    }

    #[test]
    fn test_parcel_ids_unique_across_batches() {
        let rng = SimRandomProvider::new(3);
        let mut generator = generator(HubConfig::default().batch_profile());
        let mut seen = HashSet::new();
        for tick in 0..20 {
            for parcel in generator.generate_batch(&rng, tick) {
                assert!(seen.insert(parcel.id()));
            }
        }
        assert_eq!(seen.len() as u64, generator.parcels_generated());
    }

    #[test]
    fn test_full_cluster_routes_everything_to_one_station() {
        let rng = SimRandomProvider::new(17);
        let mut generator = generator(profile(40.0, 5.0, 1.0, 8));
        let batch = generator.generate_batch(&rng, 0);
        let first = batch[0].destination();
        assert!(batch.iter().all(|p| p.destination() == first));
    }

    #[test]
    fn test_zero_stations_rejected() {
        assert!(matches!(
            ArrivalGenerator::new(profile(10.0, 1.0, 0.7, 0)),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_batch_size_clamped() {
        let rng = SimRandomProvider::new(21);
        let mut generator = generator(profile(1e12, 0.0, 0.7, 4));
        let batch = generator.generate_batch(&rng, 0);
        assert_eq!(batch.len(), MAX_BATCH_SIZE as usize);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let rng = SimRandomProvider::new(99);
        let mut items: Vec<u32> = (0..100).collect();
        shuffle(&rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
        assert_ne!(items, sorted);
    }

    #[test]
    fn test_same_seed_same_batch() {
        let mut a = generator(HubConfig::default().batch_profile());
        let mut b = generator(HubConfig::default().batch_profile());
        let batch_a = a.generate_batch(&SimRandomProvider::new(8), 1);
        let batch_b = b.generate_batch(&SimRandomProvider::new(8), 1);
        assert_eq!(batch_a, batch_b);
    }
}
