// SPDX-License-Identifier: Apache-2.0

//! Simulates a firmware sending a pretty-printed status document over a
//! transport that accepts at most 48 bytes per write.

use picogen::{GenConfig, GenResult, JsonGenCursor, JsonStreamGen};

struct DeviceStatus {
    firmware: &'static str,
    uptime_s: u64,
    battery_v: f32,
    rssi_dbm: i32,
    alerts: [&'static str; 2],
}

fn generate_status(jw: &mut JsonGenCursor, ctx: &DeviceStatus) -> GenResult {
    jw.add_string(Some("fw"), Some(ctx.firmware))?;
    jw.add_u64(Some("uptime"), ctx.uptime_s)?;
    jw.add_f32_limited_fixed_point(Some("battery"), ctx.battery_v, 3)?;
    jw.add_i32(Some("rssi"), ctx.rssi_dbm)?;
    jw.start_array(Some("alerts"))?;
    for alert in ctx.alerts.iter() {
        jw.add_string(None, Some(*alert))?;
    }
    jw.end_array()?;
    Ok(())
}

fn main() {
    let status = DeviceStatus {
        firmware: "v1.4.2",
        uptime_s: 86_473,
        battery_v: 2.987,
        rssi_dbm: -67,
        alerts: ["low_battery", "clock_drift"],
    };

    let cfg = GenConfig {
        formatted: true,
        ..Default::default()
    };
    let mut chunk_buf = [0u8; 48];
    let mut gen = JsonStreamGen::new(cfg, generate_status, status, &mut chunk_buf)
        .expect("failed to create the generator");

    println!("status document, {} bytes:", gen.calc_size().expect("size pass failed"));
    loop {
        match gen.next_chunk() {
            Ok(Some(chunk)) => print!("{chunk}"),
            Ok(None) => break,
            Err(err) => {
                eprintln!("generation failed: {err}");
                std::process::exit(1);
            }
        }
    }
    println!();
}
