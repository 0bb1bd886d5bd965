// SPDX-License-Identifier: Apache-2.0

//! Splits a document description into helper functions.
//!
//! Helpers take the cursor by mutable reference and consume replay slots
//! from the same sequence as the main callback, so repeated structure can be
//! factored out freely as long as the call order stays deterministic.

use picogen::{GenConfig, GenResult, JsonGenCursor, JsonStreamGen};

struct Sensor {
    name: &'static str,
    temperature: f32,
    humidity: f32,
}

struct Station {
    mac: [u8; 6],
    sensors: [Sensor; 2],
}

fn generate_sensor(jw: &mut JsonGenCursor, sensor: &Sensor) -> GenResult {
    jw.start_object(Some(sensor.name))?;
    jw.add_f32_limited_fixed_point(Some("temperature"), sensor.temperature, 2)?;
    jw.add_f32_limited_fixed_point(Some("humidity"), sensor.humidity, 1)?;
    jw.end_object()?;
    Ok(())
}

fn generate_station(jw: &mut JsonGenCursor, ctx: &Station) -> GenResult {
    jw.add_hex_buf(Some("mac"), &ctx.mac)?;
    for sensor in ctx.sensors.iter() {
        generate_sensor(jw, sensor)?;
    }
    Ok(())
}

fn main() {
    let station = Station {
        mac: [0xC8, 0x25, 0x2D, 0x8E, 0x9C, 0x2C],
        sensors: [
            Sensor {
                name: "indoor",
                temperature: 21.37,
                humidity: 40.2,
            },
            Sensor {
                name: "outdoor",
                temperature: -3.5,
                humidity: 91.7,
            },
        ],
    };

    let mut chunk_buf = [0u8; 32];
    let mut gen = JsonStreamGen::new(GenConfig::default(), generate_station, station, &mut chunk_buf)
        .expect("failed to create the generator");

    let mut out = String::new();
    loop {
        match gen.next_chunk() {
            Ok(Some(chunk)) => out.push_str(chunk),
            Ok(None) => break,
            Err(err) => {
                eprintln!("Error while generating json: {err}");
                std::process::exit(1);
            }
        }
    }
    println!("{out}");
}
