// SPDX-License-Identifier: Apache-2.0

//! Replay cursor and emission primitives.
//!
//! Every emission method consumes one slot of the replay sequence. A method
//! whose slot is below the persisted stage counter replays as a no-op; the
//! method whose slot matches attempts the emission and, on success, advances
//! the stage and unwinds the callback through `?`. Helper functions taking
//! `&mut JsonGenCursor` consume slots from the same sequence, so factored-out
//! document fragments need no special handling.

use core::fmt;

use crate::escape_processor::EscapeProcessor;
use crate::fixed_point::{
    limited_f32_to_str, limited_f64_to_str, LIMITED_F32_STR_BUF_SIZE, LIMITED_F64_STR_BUF_SIZE,
};
use crate::float_format::{f32_to_str, f64_to_str, FloatNotation, F32_STR_BUF_SIZE, F64_STR_BUF_SIZE};
use crate::gen_error::GenError;
use crate::generator::GenCore;
use crate::shared::{GenResult, GenYield};
use crate::str_buf::StrBuf;

/// Handle through which a generator callback describes its document.
///
/// Item names are `Option<&str>`: `Some(name)` adds a field to the enclosing
/// object, `None` adds an element to the enclosing array. The engine does not
/// verify that the choice matches the container kind currently open.
pub struct JsonGenCursor<'a, 'b> {
    core: &'a mut GenCore<'b>,
    local_step: u32,
}

impl<'a, 'b> JsonGenCursor<'a, 'b> {
    pub(crate) fn new(core: &'a mut GenCore<'b>) -> Self {
        Self { core, local_step: 0 }
    }

    /// Replay gate: skip statements already emitted in earlier drive cycles,
    /// run the one matching the persisted stage, and yield after it.
    fn step(&mut self, emit: impl FnOnce(&mut GenCore<'b>) -> bool) -> GenResult {
        let slot = self.local_step;
        self.local_step = self.local_step.wrapping_add(1);
        if slot != self.core.stage {
            return Ok(());
        }
        if !emit(self.core) {
            return Err(GenYield::Halted);
        }
        self.core.stage += 1;
        Err(GenYield::ItemEmitted)
    }

    /// Opens a nested object.
    pub fn start_object(&mut self, name: Option<&str>) -> GenResult {
        self.step(|core| core.start_container(name, '{'))
    }

    /// Closes the most recently opened object.
    pub fn end_object(&mut self) -> GenResult {
        self.step(|core| core.end_container('}'))
    }

    /// Opens a nested array.
    pub fn start_array(&mut self, name: Option<&str>) -> GenResult {
        self.step(|core| core.start_container(name, '['))
    }

    /// Closes the most recently opened array.
    pub fn end_array(&mut self) -> GenResult {
        self.step(|core| core.end_container(']'))
    }

    /// Adds a string value, escaping it as needed. A `None` value adds `null`.
    pub fn add_string(&mut self, name: Option<&str>, val: Option<&str>) -> GenResult {
        self.step(|core| core.add_string_value(name, val))
    }

    /// Adds a pre-sanitized string value without any escaping.
    pub fn add_raw_string(&mut self, name: Option<&str>, val: Option<&str>) -> GenResult {
        self.step(|core| match val {
            Some(val) => core.add_value(name, format_args!("\"{val}\"")),
            None => core.add_value(name, format_args!("null")),
        })
    }

    pub fn add_i32(&mut self, name: Option<&str>, val: i32) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("{val}")))
    }

    pub fn add_u32(&mut self, name: Option<&str>, val: u32) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("{val}")))
    }

    pub fn add_i64(&mut self, name: Option<&str>, val: i64) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("{val}")))
    }

    pub fn add_u64(&mut self, name: Option<&str>, val: u64) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("{val}")))
    }

    pub fn add_bool(&mut self, name: Option<&str>, val: bool) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("{val}")))
    }

    pub fn add_null(&mut self, name: Option<&str>) -> GenResult {
        self.step(|core| core.add_value(name, format_args!("null")))
    }

    /// Adds a float with the minimal representation that round-trips.
    /// Non-finite values degrade to `null`.
    pub fn add_f32(&mut self, name: Option<&str>, val: f32) -> GenResult {
        self.step(|core| core.add_f32_value(name, val, FloatNotation::RoundTrip))
    }

    /// Adds a float with exactly `sig_digits` significant digits.
    pub fn add_f32_with_precision(&mut self, name: Option<&str>, val: f32, sig_digits: u32) -> GenResult {
        self.step(|core| core.add_f32_value(name, val, FloatNotation::Significant(sig_digits)))
    }

    /// Adds a float with exactly `decimals` digits after the decimal point.
    pub fn add_f32_fixed_point(&mut self, name: Option<&str>, val: f32, decimals: u32) -> GenResult {
        self.step(|core| core.add_f32_value(name, val, FloatNotation::FixedDecimals(decimals)))
    }

    /// Adds a float in fixed-decimal form computed via integer scaling, for
    /// digit output independent of the host float-to-string conversion.
    /// Values whose scaled magnitude cannot be represented degrade to `null`.
    pub fn add_f32_limited_fixed_point(&mut self, name: Option<&str>, val: f32, decimals: u32) -> GenResult {
        self.step(|core| core.add_limited_f32_value(name, val, decimals))
    }

    /// Adds a double with the minimal representation that round-trips.
    /// Non-finite values degrade to `null`.
    pub fn add_f64(&mut self, name: Option<&str>, val: f64) -> GenResult {
        self.step(|core| core.add_f64_value(name, val, FloatNotation::RoundTrip))
    }

    /// Adds a double with exactly `sig_digits` significant digits.
    pub fn add_f64_with_precision(&mut self, name: Option<&str>, val: f64, sig_digits: u32) -> GenResult {
        self.step(|core| core.add_f64_value(name, val, FloatNotation::Significant(sig_digits)))
    }

    /// Adds a double with exactly `decimals` digits after the decimal point.
    pub fn add_f64_fixed_point(&mut self, name: Option<&str>, val: f64, decimals: u32) -> GenResult {
        self.step(|core| core.add_f64_value(name, val, FloatNotation::FixedDecimals(decimals)))
    }

    /// Adds a double in fixed-decimal form computed via integer scaling.
    pub fn add_f64_limited_fixed_point(&mut self, name: Option<&str>, val: f64, decimals: u32) -> GenResult {
        self.step(|core| core.add_limited_f64_value(name, val, decimals))
    }

    /// Adds a byte buffer as a quoted string of uppercase hex digit pairs.
    pub fn add_hex_buf(&mut self, name: Option<&str>, buf: &[u8]) -> GenResult {
        self.step(|core| core.add_hex_value(name, buf))
    }
}

impl GenCore<'_> {
    /// Separator, end-of-line, indentation and optional `"name":` before an
    /// item. Rolls back to `saved_idx` (the item start) on overflow.
    fn print_prefix(&mut self, saved_idx: usize, name: Option<&str>) -> bool {
        let sep = if self.is_first_item { "" } else { "," };
        let eol = self.eol();
        let indent = self.indent(self.cur_nesting_level);
        match name {
            Some(key) => {
                let delim = self.key_delimiter();
                self.chunk
                    .append_fmt(saved_idx, format_args!("{sep}{eol}{indent}\"{key}\":{delim}"))
            }
            None => self
                .chunk
                .append_fmt(saved_idx, format_args!("{sep}{eol}{indent}")),
        }
    }

    pub(crate) fn start_container(&mut self, name: Option<&str>, bracket: char) -> bool {
        if self.cur_nesting_level == self.cfg.max_nesting_level {
            self.fail = Some(GenError::NestingTooDeep);
            return false;
        }
        let saved_idx = self.chunk.idx();
        if !self.print_prefix(saved_idx, name) {
            return false;
        }
        if !self.chunk.append_fmt(saved_idx, format_args!("{bracket}")) {
            return false;
        }
        self.cur_nesting_level += 1;
        self.is_first_item = true;
        true
    }

    pub(crate) fn end_container(&mut self, bracket: char) -> bool {
        // the top-level object is engine-owned; the callback may only close
        // containers it opened itself
        if self.cur_nesting_level <= 1 {
            self.fail = Some(GenError::UnbalancedBrackets);
            return false;
        }
        let saved_idx = self.chunk.idx();
        let done = if self.is_first_item {
            self.chunk.append_fmt(saved_idx, format_args!("{bracket}"))
        } else {
            let eol = self.eol();
            let indent = self.indent(self.cur_nesting_level - 1);
            self.chunk
                .append_fmt(saved_idx, format_args!("{eol}{indent}{bracket}"))
        };
        if !done {
            return false;
        }
        self.cur_nesting_level -= 1;
        self.is_first_item = false;
        true
    }

    pub(crate) fn add_value(&mut self, name: Option<&str>, value: fmt::Arguments<'_>) -> bool {
        let saved_idx = self.chunk.idx();
        if !self.print_prefix(saved_idx, name) {
            return false;
        }
        if !self.chunk.append_fmt(saved_idx, value) {
            return false;
        }
        self.is_first_item = false;
        true
    }

    pub(crate) fn add_string_value(&mut self, name: Option<&str>, val: Option<&str>) -> bool {
        let Some(val) = val else {
            return self.add_value(name, format_args!("null"));
        };
        if !EscapeProcessor::needs_escaping(val) {
            return self.add_value(name, format_args!("\"{val}\""));
        }

        let saved_idx = self.chunk.idx();
        if !self.print_prefix(saved_idx, name) {
            return false;
        }
        if !self.chunk.append_bytes(saved_idx, b"\"") {
            return false;
        }
        for byte in val.bytes() {
            let done = match EscapeProcessor::escape_char(byte) {
                Some(escaped) => self.chunk.append_bytes(saved_idx, &[b'\\', escaped]),
                None => self.chunk.append_bytes(saved_idx, &[byte]),
            };
            if !done {
                return false;
            }
        }
        if !self.chunk.append_bytes(saved_idx, b"\"") {
            return false;
        }
        self.is_first_item = false;
        true
    }

    pub(crate) fn add_hex_value(&mut self, name: Option<&str>, buf: &[u8]) -> bool {
        let saved_idx = self.chunk.idx();
        if !self.print_prefix(saved_idx, name) {
            return false;
        }
        if !self.chunk.append_bytes(saved_idx, b"\"") {
            return false;
        }
        for &byte in buf {
            if !self.chunk.append_fmt(saved_idx, format_args!("{byte:02X}")) {
                return false;
            }
        }
        if !self.chunk.append_bytes(saved_idx, b"\"") {
            return false;
        }
        self.is_first_item = false;
        true
    }

    pub(crate) fn add_f32_value(&mut self, name: Option<&str>, val: f32, notation: FloatNotation) -> bool {
        let mut rendered = StrBuf::<F32_STR_BUF_SIZE>::new();
        if !f32_to_str(&mut rendered, val, notation, (self.cfg.decimal_point)()) {
            return self.add_value(name, format_args!("null"));
        }
        let text = rendered.as_str();
        self.add_value(name, format_args!("{text}"))
    }

    pub(crate) fn add_f64_value(&mut self, name: Option<&str>, val: f64, notation: FloatNotation) -> bool {
        let mut rendered = StrBuf::<F64_STR_BUF_SIZE>::new();
        if !f64_to_str(&mut rendered, val, notation, (self.cfg.decimal_point)()) {
            return self.add_value(name, format_args!("null"));
        }
        let text = rendered.as_str();
        self.add_value(name, format_args!("{text}"))
    }

    pub(crate) fn add_limited_f32_value(&mut self, name: Option<&str>, val: f32, decimals: u32) -> bool {
        let mut rendered = StrBuf::<LIMITED_F32_STR_BUF_SIZE>::new();
        if !limited_f32_to_str(&mut rendered, val, decimals) {
            return self.add_value(name, format_args!("null"));
        }
        let text = rendered.as_str();
        self.add_value(name, format_args!("{text}"))
    }

    pub(crate) fn add_limited_f64_value(&mut self, name: Option<&str>, val: f64, decimals: u32) -> bool {
        let mut rendered = StrBuf::<LIMITED_F64_STR_BUF_SIZE>::new();
        if !limited_f64_to_str(&mut rendered, val, decimals) {
            return self.add_value(name, format_args!("null"));
        }
        let text = rendered.as_str();
        self.add_value(name, format_args!("{text}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::JsonStreamGen;
    use crate::shared::GenConfig;

    fn run_to_string<C, F>(gen: &mut JsonStreamGen<'_, C, F>) -> String
    where
        F: Fn(&mut JsonGenCursor<'_, '_>, &C) -> GenResult,
    {
        let mut out = String::new();
        while let Some(chunk) = gen.next_chunk().expect("generation failed") {
            out.push_str(chunk);
        }
        out
    }

    #[test]
    fn test_names_select_object_or_array_placement() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.start_array(Some("arr"))?;
            jw.add_u32(None, 1)?;
            jw.add_string(None, Some("two"))?;
            jw.add_bool(None, false)?;
            jw.add_null(None)?;
            jw.end_array()?;
            Ok(())
        }
        let mut buf = [0u8; 64];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        assert_eq!(run_to_string(&mut gen), r#"{"arr":[1,"two",false,null]}"#);
    }

    #[test]
    fn test_integers_cover_full_range() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.add_i32(Some("i32_min"), i32::MIN)?;
            jw.add_i32(Some("i32_max"), i32::MAX)?;
            jw.add_u32(Some("u32_max"), u32::MAX)?;
            jw.add_i64(Some("i64_min"), i64::MIN)?;
            jw.add_i64(Some("i64_max"), i64::MAX)?;
            jw.add_u64(Some("u64_max"), u64::MAX)?;
            Ok(())
        }
        let mut buf = [0u8; 64];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        assert_eq!(
            run_to_string(&mut gen),
            "{\"i32_min\":-2147483648,\"i32_max\":2147483647,\
             \"u32_max\":4294967295,\
             \"i64_min\":-9223372036854775808,\"i64_max\":9223372036854775807,\
             \"u64_max\":18446744073709551615}"
        );
    }

    #[test]
    fn test_string_none_becomes_null() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.add_string(Some("a"), None)?;
            jw.add_raw_string(Some("b"), None)?;
            Ok(())
        }
        let mut buf = [0u8; 32];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        assert_eq!(run_to_string(&mut gen), r#"{"a":null,"b":null}"#);
    }

    #[test]
    fn test_raw_string_skips_escaping() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.add_raw_string(Some("pre"), Some("already \\\"quoted\\\""))?;
            Ok(())
        }
        let mut buf = [0u8; 48];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        assert_eq!(run_to_string(&mut gen), "{\"pre\":\"already \\\"quoted\\\"\"}");
    }

    #[test]
    fn test_hex_buffer() {
        fn cb(jw: &mut JsonGenCursor, ctx: &[u8; 3]) -> GenResult {
            jw.add_hex_buf(Some("key"), ctx)?;
            jw.add_hex_buf(Some("empty"), &[])?;
            Ok(())
        }
        let mut buf = [0u8; 48];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, [0x01, 0x80, 0xCC], &mut buf).unwrap();
        assert_eq!(run_to_string(&mut gen), r#"{"key":"0180CC","empty":""}"#);
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.add_f32(Some("nan"), f32::NAN)?;
            jw.add_f32(Some("inf"), f32::INFINITY)?;
            jw.add_f64(Some("ninf"), f64::NEG_INFINITY)?;
            jw.add_f64_with_precision(Some("pnan"), f64::NAN, 5)?;
            jw.add_f32_fixed_point(Some("fnan"), f32::NAN, 2)?;
            jw.add_f64_limited_fixed_point(Some("lnan"), f64::NAN, 2)?;
            Ok(())
        }
        let mut buf = [0u8; 96];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        assert_eq!(
            run_to_string(&mut gen),
            r#"{"nan":null,"inf":null,"ninf":null,"pnan":null,"fnan":null,"lnan":null}"#
        );
    }

    #[test]
    fn test_escaped_string_rolls_back_whole_item() {
        fn cb(jw: &mut JsonGenCursor, _ctx: &()) -> GenResult {
            jw.add_string(Some("k"), Some("a\nb"))?;
            jw.add_string(Some("long"), Some("tail\tthat never fits"))?;
            Ok(())
        }
        let mut buf = [0u8; 12];
        let mut gen = JsonStreamGen::new(GenConfig::default(), cb, (), &mut buf).unwrap();
        // first item fits (1 + 11 = 12); the second never will
        assert_eq!(gen.next_chunk(), Ok(Some("{\"k\":\"a\\nb\"")));
        assert_eq!(gen.next_chunk(), Err(crate::GenError::InsufficientBuffer));
    }
}
