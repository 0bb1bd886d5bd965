// SPDX-License-Identifier: Apache-2.0

//! Generates a sensor report in small fixed-size chunks.
//!
//! The document never exists in memory as a whole; each `next_chunk` call
//! fills a 40-byte buffer and the loop forwards it (here: to stdout).

use picogen::{GenConfig, GenResult, JsonGenCursor, JsonStreamGen};

#[derive(Default)]
struct UserData {
    val1: bool,
    val2: i32,
    val3: f32,
    val4: String,
    array: [u32; 10],
}

fn generate_report(jw: &mut JsonGenCursor, ctx: &UserData) -> GenResult {
    jw.add_bool(Some("key1"), ctx.val1)?;
    jw.add_i32(Some("key2"), ctx.val2)?;
    jw.add_f32(Some("key3"), ctx.val3)?;
    jw.add_string(Some("key4"), Some(ctx.val4.as_str()))?;
    jw.start_object(Some("key5"))?;
    {
        jw.start_array(Some("key6"))?;
        for val in ctx.array.iter() {
            jw.add_u32(None, *val)?;
        }
        jw.end_array()?;
    }
    jw.end_object()?;
    Ok(())
}

fn main() {
    let cfg = GenConfig {
        max_nesting_level: 3,
        ..Default::default()
    };
    let mut chunk_buf = [0u8; 40];
    let mut gen = JsonStreamGen::new(cfg, generate_report, UserData::default(), &mut chunk_buf)
        .expect("failed to create the generator");

    let ctx = gen.context_mut();
    ctx.val1 = true;
    ctx.val2 = 10;
    ctx.val3 = 20.5;
    ctx.val4 = "Hello".into();
    for (i, slot) in ctx.array.iter_mut().enumerate() {
        *slot = 100 + i as u32;
    }

    let total = gen.calc_size().expect("size pass failed");
    println!("Generating a JSON object of {total} bytes, in chunks of no more than 40 bytes each.");

    let mut chunk_num = 0;
    loop {
        match gen.next_chunk() {
            Ok(Some(chunk)) => {
                chunk_num += 1;
                println!("Generated chunk {chunk_num} ({} bytes): '{chunk}'", chunk.len());
            }
            Ok(None) => break,
            Err(err) => {
                eprintln!("Error while generating json: {err}");
                std::process::exit(1);
            }
        }
    }
    println!("Json generation successfully completed.");
}
