//! Error types for the codec layer

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while encoding words or mapping addresses
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A value lies outside its contiguous domain `[0, max]`
    #[error("{field} = {value} out of range (max: {max})")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Value that was supplied
        value: u64,
        /// Largest accepted value
        max: u64,
    },

    /// A value is not one of the enumerated codes accepted for a field
    #[error("{field} = {value} is not valid (expected {expected})")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Value that was supplied
        value: u64,
        /// Human readable list of accepted values
        expected: &'static str,
    },

    /// A name is not one of the enumerated names accepted for a field
    #[error("unknown {field} '{name}' (expected {expected})")]
    UnknownName {
        /// Name of the offending field
        field: &'static str,
        /// Name that was supplied
        name: String,
        /// Human readable list of accepted names
        expected: &'static str,
    },

    /// A precondition on the shape of the configuration is violated
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Reason the configuration was rejected
        reason: String,
    },
}

impl CodecError {
    /// Create an out of range error
    pub fn out_of_range(field: &'static str, value: impl Into<u64>, max: impl Into<u64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        }
    }

    /// Create an invalid enumerated value error
    pub fn invalid_value(field: &'static str, value: impl Into<u64>, expected: &'static str) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            expected,
        }
    }

    /// Create an unknown enumerated name error
    pub fn unknown_name(field: &'static str, name: impl Into<String>, expected: &'static str) -> Self {
        Self::UnknownName {
            field,
            name: name.into(),
            expected,
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True for errors caused by an input exceeding its documented domain
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::InvalidValue { .. } | Self::UnknownName { .. }
        )
    }

    /// True for errors caused by a malformed configuration shape
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Check `value <= max`, naming the field in the error
pub(crate) fn check_max(field: &'static str, value: impl Into<u64>, max: impl Into<u64>) -> Result<()> {
    let (value, max) = (value.into(), max.into());
    if value > max {
        return Err(CodecError::OutOfRange { field, value, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CodecError::out_of_range("coarse", 8u8, 7u8);
        assert!(matches!(err, CodecError::OutOfRange { field: "coarse", value: 8, max: 7 }));
        assert!(err.is_range_error());
        assert!(!err.is_config_error());

        let err = CodecError::config("empty rate table");
        assert!(err.is_config_error());
        assert!(!err.is_range_error());

        let err = CodecError::invalid_value("chip", 3u8, "0, 4, 8 or 12");
        assert!(err.is_range_error());

        let err = CodecError::unknown_name("synapse type", "medium", "s_inh, f_inh, s_exc or f_exc");
        assert!(err.is_range_error());
        assert!(!err.is_config_error());
        assert_eq!(
            err.to_string(),
            "unknown synapse type 'medium' (expected s_inh, f_inh, s_exc or f_exc)"
        );
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::out_of_range("cam slot", 64u8, 63u8);
        assert_eq!(format!("{}", err), "cam slot = 64 out of range (max: 63)");

        let err = CodecError::config("burst holds no words");
        assert!(format!("{}", err).contains("Invalid configuration"));
    }

    #[test]
    fn test_check_max() {
        assert!(check_max("fine", 255u8, 255u8).is_ok());
        assert_eq!(
            check_max("fine", 256u16, 255u8),
            Err(CodecError::out_of_range("fine", 256u16, 255u8))
        );
    }
}
