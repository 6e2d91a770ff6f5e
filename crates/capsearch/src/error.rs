use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type shared by the space, search, and store layers.
#[derive(Debug)]
pub enum CapError {
    /// Field order is not a prime >= 2.
    InvalidField { q: u32 },
    /// `q^n` does not fit the index type.
    SpaceTooLarge { q: u32, n: usize },
    /// A point or cap does not belong to the expected space.
    DimensionMismatch { expected: usize, got: usize },
    /// A coordinate is not reduced into `0..q`.
    CoordinateOutOfRange { coord: u32, q: u32 },
    /// An elimination task produced an index outside `[0, q^n)`.
    IndexOutOfRange { index: usize, size: usize },
    /// A wave finished with fewer marks than dispatched.
    IncompleteWave { expected: usize, marked: usize },
    /// The elimination worker pool could not be built.
    Pool { reason: String },
    /// A cap state string could not be parsed.
    StateString { reason: String },
    /// A persisted solution is inconsistent.
    CorruptSolution { reason: String },
    Io { path: PathBuf, source: io::Error },
    Format { path: PathBuf, source: serde_json::Error },
}

impl CapError {
    pub(crate) fn state(reason: impl Into<String>) -> Self {
        Self::StateString {
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSolution {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for CapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { q } => write!(f, "field order {q} is not a prime >= 2"),
            Self::SpaceTooLarge { q, n } => write!(f, "F_{q}^{n} has too many points to index"),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "expected {expected} coordinates, got {got}")
            }
            Self::CoordinateOutOfRange { coord, q } => {
                write!(f, "coordinate {coord} not reduced mod {q}")
            }
            Self::IndexOutOfRange { index, size } => {
                write!(f, "point index {index} outside space of {size} points")
            }
            Self::IncompleteWave { expected, marked } => {
                write!(f, "elimination wave marked {marked} of {expected} points")
            }
            Self::Pool { reason } => write!(f, "elimination pool: {reason}"),
            Self::StateString { reason } => write!(f, "invalid state string: {reason}"),
            Self::CorruptSolution { reason } => write!(f, "corrupt solution: {reason}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Format { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for CapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Format { source, .. } => Some(source),
            _ => None,
        }
    }
}
