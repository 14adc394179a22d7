//! Robot Session Example
//!
//! Plays a short mission the way a simulated robot does it, using the
//! blocking client: wait for instructions, stream one telemetry report per
//! line followed on the track, then post the average speed.
//!
//! To run this example:
//! ```
//! ROBOT_SERVER_BASE_URL=http://localhost:8000 cargo run --example robot_session
//! ```

use std::thread;
use std::time::Duration;

use uuid::Uuid;

use robot_client_sdk::{
    BlockingInstructionClient, GripperState, MissionSummary, PollConfig, TelemetryReport,
};

const TRACK_LINES: u32 = 13;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let robot_id = Uuid::new_v4();
    let client = BlockingInstructionClient::from_env()?;
    let poll = PollConfig::from(client.config());

    println!("Robot {} waiting for instructions...", robot_id);
    let blocks = client.wait_for_instructions(robot_id, &poll)?;
    println!("Received {} blocks: {:?}\n", blocks.len(), blocks);

    let mut speeds = Vec::with_capacity(TRACK_LINES as usize);
    for line in 1..=TRACK_LINES {
        let speed = 0.4 + 0.05 * f64::from(line % 5);
        let ultrasonic_distance = 40.0 - f64::from(line) * 2.5;
        // The gripper closes once the last block is close enough
        let gripper_status = if ultrasonic_distance < 10.0 {
            GripperState::Closed
        } else {
            GripperState::Open
        };

        let report = TelemetryReport {
            robot_id,
            speed,
            ultrasonic_distance,
            movement_status: "AVANCER".to_string(),
            line,
            gripper_status,
        };

        let ack = client.send_telemetry(&report)?;
        println!(
            "line {:>2}: speed {:.2} m/s, distance {:>5.1} cm, gripper {} -> {}",
            line, speed, ultrasonic_distance, gripper_status, ack.status
        );

        speeds.push(speed);
        thread::sleep(Duration::from_millis(200));
    }

    if let Some(summary) = MissionSummary::from_speeds(robot_id, &speeds) {
        let ack = client.send_summary(&summary)?;
        println!("\nMission summary sent (average speed {:.3}): {}", summary.average_speed, ack.status);
    }

    Ok(())
}
