// SPDX-License-Identifier: Apache-2.0

//! The resumable generation engine.
//!
//! One [`JsonStreamGen`] owns a caller-provided chunk buffer and a user
//! context, and drives the user's structure-description callback through a
//! small state machine. Suspension is emulated: the callback returns to the
//! engine after every single emitted item, and on the next drive cycle it is
//! re-invoked from its start, fast-forwarding past already-emitted items by
//! comparing a local statement counter against the persisted stage counter.

use log::debug;

use crate::chunk_buffer::ChunkBuffer;
use crate::cursor::JsonGenCursor;
use crate::gen_error::GenError;
use crate::shared::{GenConfig, GenResult, GenYield, Indent, MIN_CHUNK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GenState {
    OpeningBracket,
    GeneratingItems,
    ClosingBracket,
    Finished,
    Failed(GenError),
}

/// Mutable engine state shared between the state machine and the cursor's
/// emission primitives. Apart from the chunk buffer, the whole generation
/// position is two integers: `stage` and `cur_nesting_level`.
pub(crate) struct GenCore<'b> {
    pub(crate) cfg: GenConfig,
    pub(crate) chunk: ChunkBuffer<'b>,
    pub(crate) cur_nesting_level: u32,
    pub(crate) is_first_item: bool,
    pub(crate) stage: u32,
    pub(crate) state: GenState,
    /// Structural failure recorded by an emission primitive during the
    /// current drive cycle; distinguishes "item does not fit" from
    /// "document shape is broken".
    pub(crate) fail: Option<GenError>,
}

impl GenCore<'_> {
    pub(crate) fn eol(&self) -> &'static str {
        if self.cfg.formatted {
            "\n"
        } else {
            ""
        }
    }

    pub(crate) fn indent(&self, level: u32) -> Indent {
        Indent {
            mark: self.cfg.indentation_mark,
            count: if self.cfg.formatted {
                level.saturating_mul(self.cfg.indentation)
            } else {
                0
            },
        }
    }

    /// One indentation mark between a key's colon and its value.
    pub(crate) fn key_delimiter(&self) -> Indent {
        Indent {
            mark: self.cfg.indentation_mark,
            count: u32::from(self.cfg.formatted),
        }
    }

    fn enter_failed(&mut self, err: GenError) {
        debug!("json generation failed: {err}");
        self.state = GenState::Failed(err);
    }

    fn step_opening_bracket(&mut self) -> bool {
        if self.cur_nesting_level >= self.cfg.max_nesting_level {
            self.enter_failed(GenError::NestingTooDeep);
            return false;
        }
        let saved_idx = self.chunk.idx();
        let indent = self.indent(self.cur_nesting_level);
        if !self.chunk.append_fmt(saved_idx, format_args!("{indent}{{")) {
            return false;
        }
        self.state = GenState::GeneratingItems;
        self.cur_nesting_level += 1;
        true
    }

    fn step_closing_bracket(&mut self) -> bool {
        // only the engine-opened top-level object may remain; anything else
        // means the callback left containers unclosed
        if self.cur_nesting_level != 1 {
            self.enter_failed(GenError::UnbalancedBrackets);
            return false;
        }
        let saved_idx = self.chunk.idx();
        let eol = self.eol();
        let indent = self.indent(self.cur_nesting_level - 1);
        if !self.chunk.append_fmt(saved_idx, format_args!("{eol}{indent}}}")) {
            return false;
        }
        self.cur_nesting_level -= 1;
        self.state = GenState::Finished;
        true
    }
}

/// Streaming JSON generator for a single document shape.
///
/// The callback describes the document as a linear sequence of emission
/// statements against a [`JsonGenCursor`], reading its input from the typed
/// context `C`. The engine owns the context; populate it through
/// [`context_mut`](Self::context_mut) before the first
/// [`next_chunk`](Self::next_chunk) call.
///
/// # Callback contract
///
/// The callback is re-executed from its first statement on every drive cycle
/// and must traverse the exact same statement sequence each time (a pure,
/// deterministic function of the context). Conditional or re-ordered
/// emission between invocations desynchronizes the replay counter and
/// corrupts the output.
pub struct JsonStreamGen<'b, C, F>
where
    F: Fn(&mut JsonGenCursor<'_, '_>, &C) -> GenResult,
{
    core: GenCore<'b>,
    callback: F,
    context: C,
}

impl<'b, C, F> JsonStreamGen<'b, C, F>
where
    F: Fn(&mut JsonGenCursor<'_, '_>, &C) -> GenResult,
{
    /// Creates a generator writing chunks into the caller-provided buffer.
    ///
    /// The buffer length is the chunk capacity and must be at least
    /// [`MIN_CHUNK_SIZE`](crate::MIN_CHUNK_SIZE) bytes.
    pub fn new(cfg: GenConfig, callback: F, context: C, buf: &'b mut [u8]) -> Result<Self, GenError> {
        if buf.len() < MIN_CHUNK_SIZE {
            return Err(GenError::BufferTooSmall {
                size: buf.len(),
                min: MIN_CHUNK_SIZE,
            });
        }
        if cfg.max_nesting_level == 0 {
            return Err(GenError::InvalidConfig("max_nesting_level must be at least 1"));
        }
        if cfg.formatted && (cfg.indentation == 0 || cfg.indentation_mark == 0) {
            return Err(GenError::InvalidConfig(
                "formatted output requires an indentation width and mark",
            ));
        }
        Ok(Self {
            core: GenCore {
                cfg,
                chunk: ChunkBuffer::new(buf),
                cur_nesting_level: 0,
                is_first_item: true,
                stage: 0,
                state: GenState::OpeningBracket,
                fail: None,
            },
            callback,
            context,
        })
    }

    /// The per-document input data read by the callback.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the per-document input data.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Produces the next piece of the document.
    ///
    /// Returns `Ok(Some(chunk))` with up to one buffer's worth of output,
    /// `Ok(None)` once the document is complete, or the generation error.
    /// After an error the instance stays unusable until [`reset`](Self::reset).
    pub fn next_chunk(&mut self) -> Result<Option<&str>, GenError> {
        if let GenState::Failed(err) = self.core.state {
            return Err(err);
        }
        self.core.chunk.clear();
        while self.drive_step() {
            // keep adding items until the chunk overflows or the document ends
        }
        if let GenState::Failed(err) = self.core.state {
            return Err(err);
        }
        let chunk = self.core.chunk.as_str()?;
        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }

    /// Runs a full generation pass to compute the total document length,
    /// then resets the instance for an identical fresh pass.
    ///
    /// Only valid before the first `next_chunk` of a document; mid-stream
    /// calls fail without disturbing the generation in progress.
    pub fn calc_size(&mut self) -> Result<usize, GenError> {
        if self.core.stage != 0 {
            return Err(GenError::GenerationInProgress);
        }
        let mut total = 0usize;
        let res = loop {
            match self.next_chunk() {
                Ok(Some(chunk)) => total += chunk.len(),
                Ok(None) => break Ok(total),
                Err(err) => break Err(err),
            }
        };
        self.reset();
        res
    }

    /// Returns the instance to its pre-generation state, keeping the
    /// configuration, callback and context contents.
    pub fn reset(&mut self) {
        self.core.stage = 0;
        self.core.state = GenState::OpeningBracket;
        self.core.cur_nesting_level = 0;
        self.core.is_first_item = true;
        self.core.fail = None;
        self.core.chunk.clear();
    }

    fn drive_step(&mut self) -> bool {
        match self.core.state {
            GenState::OpeningBracket => self.core.step_opening_bracket(),
            GenState::GeneratingItems => self.step_generating_items(),
            GenState::ClosingBracket => self.core.step_closing_bracket(),
            GenState::Finished | GenState::Failed(_) => false,
        }
    }

    fn step_generating_items(&mut self) -> bool {
        self.core.fail = None;
        let mut cursor = JsonGenCursor::new(&mut self.core);
        match (self.callback)(&mut cursor, &self.context) {
            // replayed to the end without emitting anything new
            Ok(()) => {
                self.core.state = GenState::ClosingBracket;
                true
            }
            Err(GenYield::ItemEmitted) => true,
            Err(GenYield::Halted) => {
                if let Some(err) = self.core.fail.take() {
                    self.core.enter_failed(err);
                } else if self.core.chunk.is_empty() {
                    // an empty chunk could not take even one item
                    self.core.enter_failed(GenError::InsufficientBuffer);
                }
                false
            }
        }
    }
}
