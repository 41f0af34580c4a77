use sorthub_core::{
    ArrivalGenerator, BatchProfile, HubConfig, IngestOutcome, Parcel, ParcelId, RandomProvider,
    ServiceProfile, SimRandomProvider, SortationHub, Station,
};

fn parcel(id: u64, destination: usize) -> Parcel {
    Parcel::new(ParcelId::new(id), 0, destination)
}

#[test]
fn three_parcels_to_one_station() {
    let rng = SimRandomProvider::new(1);
    let mut hub = SortationHub::new(2, 10, 5);
    for id in 0..3 {
        assert_eq!(hub.ingest(parcel(id, 0)), Ok(IngestOutcome::Accepted));
    }

    let _ = hub.tick(&rng);

    // The head of the queue goes straight into service on the same tick.
    assert_eq!(hub.station(0).map(Station::queue_depth), Some(2));
    assert_eq!(hub.station(1).map(Station::queue_depth), Some(0));
    assert_eq!(hub.belt_depth(), 0);
    assert_eq!(hub.station(0).map(|s| s.stats().total_assigned), Some(3));
}

#[test]
fn belt_overflow_jams_on_the_next_ingest() {
    let max_belt_depth = 300;
    // Station queues of zero capacity never drain the belt.
    let mut hub = SortationHub::new(2, max_belt_depth, 0);
    let rng = SimRandomProvider::new(2);

    for id in 0..max_belt_depth as u64 {
        assert_eq!(hub.ingest(parcel(id, 0)), Ok(IngestOutcome::Accepted));
        let _ = hub.tick(&rng);
        assert!(!hub.is_jammed());
    }
    assert_eq!(hub.belt_depth(), max_belt_depth);

    assert_eq!(
        hub.ingest(parcel(max_belt_depth as u64, 1)),
        Ok(IngestOutcome::Jammed)
    );
    assert!(hub.is_jammed());
    assert_eq!(hub.belt_depth(), max_belt_depth);
    assert_eq!(hub.counters().total_ingested, max_belt_depth as u64);

    // The overflow belongs to the tick the driver is about to run.
    assert_eq!(hub.jam_tick(), Some(max_belt_depth as u64 + 1));
    let _ = hub.tick(&rng);
    assert_eq!(hub.jam_tick(), Some(hub.ticks_elapsed()));
}

#[test]
fn cluster_share_converges_to_ratio() {
    let rng = SimRandomProvider::new(2024);
    let profile = BatchProfile {
        size_mean: 200.0,
        size_std_dev: 0.0,
        cluster_ratio: 0.7,
        station_count: 50,
    };
    let mut generator =
        ArrivalGenerator::new(profile).unwrap_or_else(|e| panic!("generator: {e}"));

    let mut hot = 0usize;
    let mut total = 0usize;
    for tick in 0..500 {
        let batch = generator.generate_batch(&rng, tick);
        let mut counts = vec![0usize; profile.station_count];
        for p in &batch {
            counts[p.destination()] += 1;
        }
        hot += counts.iter().copied().max().unwrap_or(0);
        total += batch.len();
    }

    // The hot station also receives its share of the uniform noise (0.3 / 50).
    let expected = 0.7 + 0.3 / profile.station_count as f64;
    let share = hot as f64 / total as f64;
    assert!(
        (share - expected).abs() < 0.02,
        "hot share {share:.4} too far from {expected:.4}"
    );
}

#[test]
fn capacity_invariants_hold_under_heavy_traffic() {
    let config = HubConfig {
        truck_arrival_probability: 0.05,
        ..HubConfig::small(6, 8, 120)
    };
    let rng = SimRandomProvider::new(31337);
    let mut hub = SortationHub::from_config(&config);
    let mut arrivals = ArrivalGenerator::new(config.batch_profile())
        .unwrap_or_else(|e| panic!("generator: {e}"));
    let mut was_jammed = false;

    for tick in 1..=5_000 {
        if rng.random_bool(config.truck_arrival_probability) {
            hub.record_arrival(tick);
            for p in arrivals.generate_batch(&rng, tick) {
                assert!(hub.ingest(p).is_ok());
            }
        }
        let _ = hub.tick(&rng);

        assert!(hub.belt_depth() <= config.max_belt_depth || hub.is_jammed());
        assert!(!was_jammed || hub.is_jammed(), "jam cleared at tick {tick}");
        was_jammed = hub.is_jammed();
        for station in hub.stations() {
            assert!(station.queue_depth() <= config.station_capacity);
            assert_eq!(station.is_busy(), station.remaining_ticks() > 0);
        }
    }

    // This load overwhelms six stations well before 5,000 ticks.
    assert!(was_jammed);
}

#[test]
fn parcels_are_conserved() {
    let rng = SimRandomProvider::new(5);
    let mut hub = SortationHub::with_profile(3, 100, 100, 5, ServiceProfile::fixed(1));
    for id in 0..30 {
        assert!(hub.ingest(parcel(id, (id % 3) as usize)).is_ok());
    }
    for _ in 0..100 {
        let _ = hub.tick(&rng);
    }

    let completed: u64 = hub.station_stats().map(|s| s.total_completed).sum();
    assert_eq!(completed, 30);
    assert_eq!(hub.belt_depth(), 0);
    assert!(hub.stations().iter().all(|s| !s.is_busy() && s.queue_depth() == 0));
}
