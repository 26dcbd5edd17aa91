//! Error taxonomy for the timing engine.
//!
//! Three kinds: naming errors (missing or invalid identifiers), contract
//! errors (wrong-shaped arguments to a constructor or mutator), and
//! internal errors (a runner strategy that returned without fully
//! populating its run). All are raised synchronously at the violating
//! call; the engine never catches its own errors.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid identifier on a run or registered function.
    Naming,
    /// Wrong-shaped argument to a constructor or mutator.
    Contract,
    /// A runner strategy terminated without fully populating its run.
    Internal,
}

/// Errors raised by the timing engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A run was constructed with an empty name.
    #[error("run name must not be empty")]
    EmptyName,

    /// A registered identifier is missing the agreed prefix.
    #[error("registered name '{name}' must start with '{prefix}'")]
    MissingPrefix {
        /// The rejected identifier.
        name: String,
        /// The required prefix for this registration kind.
        prefix: &'static str,
    },

    /// A repetition target of zero was supplied.
    #[error("repetition count must be a positive integer")]
    ZeroCount,

    /// A duration budget was zero, negative, or not finite.
    #[error("duration budget must be positive and finite, got {0} ms")]
    BadBudget(f64),

    /// An end timestamp was zero, negative, or not finite.
    #[error("end timestamp must be positive and finite, got {0}")]
    BadEnd(f64),

    /// A run was completed before it was started.
    #[error("run '{0}' has no start timestamp")]
    NotStarted(String),

    /// An end timestamp preceded the recorded start.
    #[error("end timestamp {end} precedes start {start}")]
    EndBeforeStart {
        /// The recorded start timestamp.
        start: f64,
        /// The rejected end timestamp.
        end: f64,
    },

    /// A filter pattern failed to compile.
    #[error("invalid filter pattern '{pattern}'")]
    BadFilter {
        /// The rejected pattern.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A runner strategy returned an incomplete run.
    #[error("runner left run '{name}' incomplete: {what}")]
    Incomplete {
        /// Name of the incomplete run.
        name: String,
        /// Which consistency requirement failed.
        what: &'static str,
    },
}

impl Error {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyName | Error::MissingPrefix { .. } => ErrorKind::Naming,
            Error::ZeroCount
            | Error::BadBudget(_)
            | Error::BadEnd(_)
            | Error::NotStarted(_)
            | Error::EndBeforeStart { .. }
            | Error::BadFilter { .. } => ErrorKind::Contract,
            Error::Incomplete { .. } => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_taxonomy() {
        assert_eq!(Error::EmptyName.kind(), ErrorKind::Naming);
        assert_eq!(Error::ZeroCount.kind(), ErrorKind::Contract);
        assert_eq!(Error::BadEnd(f64::NAN).kind(), ErrorKind::Contract);
        assert_eq!(
            Error::Incomplete {
                name: "x".to_string(),
                what: "average not finite",
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = Error::MissingPrefix {
            name: "speed".to_string(),
            prefix: "bench_",
        };
        assert!(err.to_string().contains("speed"));
        assert!(err.to_string().contains("bench_"));
    }
}
