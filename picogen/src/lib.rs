// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

mod chunk_buffer;

mod cursor;
pub use cursor::JsonGenCursor;

mod escape_processor;

mod fixed_point;

mod float_format;

mod gen_error;
pub use gen_error::GenError;

mod generator;
pub use generator::JsonStreamGen;

mod shared;
pub use shared::{GenConfig, GenResult, GenYield, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};

mod str_buf;
