// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// Errors that can occur while configuring or driving JSON generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenError {
    /// The caller-provided chunk buffer is below the minimum usable size.
    BufferTooSmall { size: usize, min: usize },
    /// The configuration is internally inconsistent.
    InvalidConfig(&'static str),
    /// A single item cannot fit even into an empty chunk buffer.
    InsufficientBuffer,
    /// Opening another container would exceed the configured nesting limit.
    NestingTooDeep,
    /// A container was closed that the callback never opened, or was left
    /// unclosed when the callback finished.
    UnbalancedBrackets,
    /// `calc_size` was called while chunk generation is in progress.
    GenerationInProgress,
    /// The generator entered an unexpected internal state.
    Unexpected(&'static str),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::BufferTooSmall { size, min } => {
                write!(f, "chunk buffer of {size} bytes is below the minimum of {min}")
            }
            GenError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            GenError::Unexpected(msg) => write!(f, "unexpected state: {msg}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = GenError::BufferTooSmall { size: 4, min: 8 };
        assert_eq!(
            format!("{err}"),
            "chunk buffer of 4 bytes is below the minimum of 8"
        );

        let err = GenError::InvalidConfig("max_nesting_level must be at least 1");
        assert_eq!(
            format!("{err}"),
            "invalid configuration: max_nesting_level must be at least 1"
        );
    }

    #[test]
    fn test_runtime_errors_use_debug_form() {
        assert_eq!(format!("{}", GenError::InsufficientBuffer), "InsufficientBuffer");
        assert_eq!(format!("{}", GenError::UnbalancedBrackets), "UnbalancedBrackets");
    }
}
