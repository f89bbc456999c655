//! Error types for the Experience Consolidation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while consolidating experience.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Experience Consolidation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use experience_engine::error::EngineError;
///
/// let error = EngineError::PersonNotFound {
///     person_id: "1020304050".to_string(),
/// };
/// assert_eq!(error.to_string(), "Person not found: 1020304050");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An interval ended before it started.
    #[error("Invalid interval: start date {start} is after end date {end}")]
    InvalidInterval {
        /// The start date of the offending interval.
        start: NaiveDate,
        /// The end date of the offending interval.
        end: NaiveDate,
    },

    /// No person record exists for the identifier.
    #[error("Person not found: {person_id}")]
    PersonNotFound {
        /// The identifier that was looked up.
        person_id: String,
    },

    /// The summary store could not commit a write.
    #[error("Persistence failure: {message}")]
    PersistenceFailure {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A person or ledger data file could not be read or decoded.
    #[error("Failed to load data source '{path}': {message}")]
    SourceLoadError {
        /// The path of the data file.
        path: String,
        /// A description of the load error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_interval_displays_both_dates() {
        let error = EngineError::InvalidInterval {
            start: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid interval: start date 2021-05-01 is after end date 2021-04-01"
        );
    }

    #[test]
    fn test_person_not_found_displays_id() {
        let error = EngineError::PersonNotFound {
            person_id: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "Person not found: abc");
    }

    #[test]
    fn test_persistence_failure_displays_message() {
        let error = EngineError::PersistenceFailure {
            message: "disk full".to_string(),
        };
        assert_eq!(error.to_string(), "Persistence failure: disk full");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_source_load_error_displays_path_and_message() {
        let error = EngineError::SourceLoadError {
            path: "ledger.csv".to_string(),
            message: "missing column".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load data source 'ledger.csv': missing column"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::PersonNotFound {
                person_id: "1".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
