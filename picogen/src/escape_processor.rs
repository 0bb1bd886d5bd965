// SPDX-License-Identifier: Apache-2.0

/// Shared utilities for JSON string escaping.
///
/// This module contains pure functions deciding how a byte of a string value
/// is represented on the wire; the cursor's string primitive drives them.
pub(crate) struct EscapeProcessor;

impl EscapeProcessor {
    /// Returns the character that follows the backslash in the escape
    /// sequence for `byte`, or `None` if the byte passes through unchanged.
    ///
    /// Only the two-character escapes of RFC 8259 are produced; all other
    /// bytes, including multi-byte UTF-8 sequences, are emitted verbatim.
    pub fn escape_char(byte: u8) -> Option<u8> {
        match byte {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            0x08 => Some(b'b'),
            0x0C => Some(b'f'),
            b'\n' => Some(b'n'),
            b'\r' => Some(b'r'),
            b'\t' => Some(b't'),
            _ => None,
        }
    }

    /// Pre-scan deciding whether `val` can take the fast raw emission path.
    pub fn needs_escaping(val: &str) -> bool {
        val.bytes().any(|byte| Self::escape_char(byte).is_some())
    }
}
