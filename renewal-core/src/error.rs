use thiserror::Error;

/// Errors raised when model inputs fail validation.
///
/// Validation is eager: constructors and setters check their arguments before
/// touching any state, so a returned error means nothing was changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("serial interval has no weights")]
    EmptySerialInterval,

    #[error("serial interval weight for lag {lag} must be finite and non-negative, got {value}")]
    InvalidSerialWeight { lag: usize, value: f64 },

    #[error("serial interval weights must sum to a positive value, got {sum}")]
    NonPositiveSerialSum { sum: f64 },

    #[error("serial interval candidates differ in length: expected {expected}, found {found}")]
    SerialIntervalShapeMismatch { expected: usize, found: usize },

    #[error("no serial interval candidates were supplied")]
    NoSerialIntervalCandidates,

    #[error("invalid gamma serial interval: {reason}")]
    InvalidGammaSerialInterval { reason: &'static str },

    #[error("incidence series has no data points")]
    EmptyIncidence,

    #[error("malformed columns: {times} times but {counts} counts")]
    ColumnLengthMismatch { times: usize, counts: usize },

    #[error("time {time} appears more than once")]
    DuplicateTime { time: i64 },

    #[error("count at time {time} must be finite and non-negative, got {count}")]
    InvalidCount { time: i64, count: f64 },

    #[error("prior shape and rate must be finite and positive, got {shape} and {rate}")]
    InvalidPrior { shape: f64, rate: f64 },

    #[error("posterior shape and rate must be finite and positive, got {shape} and {rate}")]
    InvalidPosterior { shape: f64, rate: f64 },

    #[error("tau must lie in 1..={span}, got {tau}")]
    TauOutOfRange { tau: usize, span: usize },

    #[error("epsilon must be finite and at least -1, got {epsilon}")]
    EpsilonOutOfRange { epsilon: f64 },

    #[error("imported cases span {start}..={end} instead of {expected_start}..={expected_end}")]
    MisalignedSeries {
        expected_start: i64,
        expected_end: i64,
        start: i64,
        end: i64,
    },

    #[error("epsilon only applies when imported cases are present")]
    NoImportedCases,

    #[error("central probability must lie strictly between 0 and 1, got {value}")]
    CentralProbabilityOutOfRange { value: f64 },

    #[error("invalid simulation times: {reason}")]
    InvalidTimes { reason: &'static str },

    #[error("invalid reproduction number profile: {reason}")]
    InvalidRProfile { reason: &'static str },

    #[error("invalid time bounds: start {start}, end {end}")]
    InvalidTimeBounds { start: i64, end: i64 },

    #[error("resolution must be at least one point")]
    ZeroResolution,

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}
