//! Parcels moving through the hub.

use std::fmt;

/// Opaque parcel identity, unique within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParcelId(u64);

impl ParcelId {
    /// Wrap a raw identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// A parcel created when its truck arrives.
///
/// Parcels are moved, never cloned: at any time exactly one queue (the
/// belt, a station queue, or a station's service slot) owns each parcel.
#[derive(Debug, PartialEq, Eq)]
pub struct Parcel {
    id: ParcelId,
    arrival_tick: u64,
    destination: usize,
}

impl Parcel {
    /// Create a parcel bound for station `destination`.
    pub fn new(id: ParcelId, arrival_tick: u64, destination: usize) -> Self {
        Self {
            id,
            arrival_tick,
            destination,
        }
    }

    /// Identity of the parcel.
    pub fn id(&self) -> ParcelId {
        self.id
    }

    /// Tick at which the parcel's truck arrived.
    pub fn arrival_tick(&self) -> u64 {
        self.arrival_tick
    }

    /// Index of the station this parcel is routed to.
    pub fn destination(&self) -> usize {
        self.destination
    }
}

impl fmt::Display for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Parcel {} | Tick: {} | Dest: {}]",
            self.id, self.arrival_tick, self.destination
        )
    }
}
