use thiserror::Error;

/// Errors that can occur while building or summarizing a simulation.
///
/// Capacity overflows are not errors: a full belt jams the hub and a full
/// station queue drops the parcel. Both are reported through outcome enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A parcel names a destination the hub does not have.
    #[error("station {station} does not exist (hub has {station_count} stations)")]
    UnknownStation {
        /// The requested destination index.
        station: usize,
        /// Number of stations in the hub.
        station_count: usize,
    },
    /// Service was started on a station that is already serving a parcel.
    #[error("station {0} is already serving a parcel")]
    StationBusy(usize),
    /// The sample standard deviation of station loads needs at least two stations.
    #[error("load standard deviation needs at least 2 stations, hub has {0}")]
    InsufficientStations(usize),
    /// The configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// An I/O error occurred while persisting results.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// A type alias for `Result<T, SimulationError>`.
pub type SimulationResult<T> = Result<T, SimulationError>;

impl From<std::io::Error> for SimulationError {
    fn from(err: std::io::Error) -> Self {
        SimulationError::IoError(err.to_string())
    }
}
