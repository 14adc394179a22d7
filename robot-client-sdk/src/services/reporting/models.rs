//! Reporting data models
//!
//! The control server keeps its historical French field names on the wire;
//! the Rust side uses English names and maps them with serde.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of the robot's gripper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GripperState {
    /// Gripper open
    Open,

    /// Gripper closed on a block
    Closed,
}

impl fmt::Display for GripperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// One telemetry sample sent while a mission runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReport {
    /// Robot identifier
    pub robot_id: Uuid,

    /// Current speed
    #[serde(rename = "vitesse")]
    pub speed: f64,

    /// Distance measured by the ultrasonic sensor
    #[serde(rename = "distance_ultrasons")]
    pub ultrasonic_distance: f64,

    /// Movement status, e.g. "STOP" or "AVANCER"
    #[serde(rename = "statut_deplacement")]
    pub movement_status: String,

    /// Line the robot is currently on
    #[serde(rename = "ligne")]
    pub line: u32,

    /// Gripper state
    #[serde(rename = "statut_pince")]
    pub gripper_status: GripperState,
}

/// Aggregate sent once a mission is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    /// Robot identifier
    pub robot_id: Uuid,

    /// Mean speed over the mission
    pub average_speed: f64,
}

impl MissionSummary {
    /// Summarize the speeds recorded during a mission
    ///
    /// Returns `None` when nothing was recorded, there is nothing to report.
    pub fn from_speeds(robot_id: Uuid, speeds: &[f64]) -> Option<Self> {
        if speeds.is_empty() {
            return None;
        }

        let average_speed = speeds.iter().sum::<f64>() / speeds.len() as f64;
        Some(Self {
            robot_id,
            average_speed,
        })
    }
}

/// Server reply to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Usually "ok"
    pub status: String,
}

impl Acknowledgement {
    /// Whether the server accepted the report
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
