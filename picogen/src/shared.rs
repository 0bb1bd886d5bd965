// SPDX-License-Identifier: Apache-2.0

//! Shared types for the streaming generator

use core::fmt;
use core::fmt::Write as _;

/// Hard minimum for the caller-provided chunk buffer.
pub const MIN_CHUNK_SIZE: usize = 8;

/// Recommended chunk buffer size when memory pressure allows it.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

pub(crate) const DEFAULT_MAX_NESTING_LEVEL: u32 = 5;
pub(crate) const DEFAULT_INDENTATION: u32 = 2;
pub(crate) const DEFAULT_INDENTATION_MARK: u8 = b' ';

/// Control signal returned through the generator callback when a drive cycle
/// must hand control back to the engine.
///
/// Callback code never constructs these values itself; the cursor's emission
/// methods produce them and `?` propagates them out of the callback.
#[derive(Debug, PartialEq, Eq)]
pub enum GenYield {
    /// One item was written into the current chunk; the engine drives again.
    ItemEmitted,
    /// The chunk ran out of space or a structural guard failed.
    Halted,
}

/// Result type threaded through generator callbacks with `?`.
///
/// `Ok(())` means the callback replayed to its end without emitting anything
/// new, which the engine reads as "document body complete".
pub type GenResult = Result<(), GenYield>;

fn default_decimal_point() -> u8 {
    b'.'
}

/// Configuration for a [`JsonStreamGen`](crate::JsonStreamGen) instance.
///
/// All fields have sensible defaults; override individual fields with struct
/// update syntax:
///
/// ```
/// use picogen::GenConfig;
///
/// let cfg = GenConfig {
///     formatted: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GenConfig {
    /// Enables pretty-printed output.
    pub formatted: bool,
    /// Character used for indentation (`b' '` or `b'\t'`).
    pub indentation_mark: u8,
    /// Number of indentation characters per nesting level.
    pub indentation: u32,
    /// Maximum depth of nested elements, including the top-level object.
    pub max_nesting_level: u32,
    /// Reports the decimal point character of the host environment. Any such
    /// character found in a rendered number is rewritten to `.` so the output
    /// stays valid JSON regardless of locale.
    pub decimal_point: fn() -> u8,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            formatted: false,
            indentation_mark: DEFAULT_INDENTATION_MARK,
            indentation: DEFAULT_INDENTATION,
            max_nesting_level: DEFAULT_MAX_NESTING_LEVEL,
            decimal_point: default_decimal_point,
        }
    }
}

/// Writes `count` copies of the indentation mark.
#[derive(Clone, Copy)]
pub(crate) struct Indent {
    pub mark: u8,
    pub count: u32,
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.count {
            f.write_char(self.mark as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = GenConfig::default();
        assert!(!cfg.formatted);
        assert_eq!(cfg.indentation_mark, b' ');
        assert_eq!(cfg.indentation, 2);
        assert_eq!(cfg.max_nesting_level, 5);
        assert_eq!((cfg.decimal_point)(), b'.');
    }

    #[test]
    fn test_indent_display() {
        let indent = Indent { mark: b' ', count: 4 };
        assert_eq!(format!("{indent}"), "    ");

        let indent = Indent { mark: b'\t', count: 2 };
        assert_eq!(format!("{indent}"), "\t\t");

        let indent = Indent { mark: b' ', count: 0 };
        assert_eq!(format!("{indent}"), "");
    }
}
