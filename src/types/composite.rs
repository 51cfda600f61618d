//! Composite value types assembled from groups of fields

use serde::{Deserialize, Serialize};

/// Three-component vector. World space uses Y as up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vec3<T> {
    pub fn from_array([x, y, z]: [T; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }
}

/// Euler angles in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Orientation<T> {
    pub pitch: T,
    pub yaw: T,
    pub roll: T,
}

impl<T: Copy> Orientation<T> {
    pub fn from_array([pitch, yaw, roll]: [T; 3]) -> Self {
        Self { pitch, yaw, roll }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TireLocation {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl TireLocation {
    pub const ALL: [TireLocation; 4] = [
        TireLocation::FrontLeft,
        TireLocation::FrontRight,
        TireLocation::RearLeft,
        TireLocation::RearRight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Measurement point across the tread, seen from behind the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TreadLocation {
    Left,
    Center,
    Right,
}

impl TreadLocation {
    pub const ALL: [TreadLocation; 3] =
        [TreadLocation::Left, TreadLocation::Center, TreadLocation::Right];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Tire temperatures in Kelvin, 3 tread points for each of the 4 tires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TireTemps {
    pub values: [f32; 12],
}

impl TireTemps {
    pub const LEN: usize = 12;

    /// Flat element index of a tread point.
    pub const fn element_index(tire: TireLocation, tread: TreadLocation) -> usize {
        tire.index() * 3 + tread.index()
    }

    pub fn get(&self, tire: TireLocation, tread: TreadLocation) -> f32 {
        self.values[Self::element_index(tire, tread)]
    }

    pub fn tire(&self, tire: TireLocation) -> [f32; 3] {
        let start = tire.index() * 3;
        [self.values[start], self.values[start + 1], self.values[start + 2]]
    }

    /// Mean of the three tread points.
    pub fn average(&self, tire: TireLocation) -> f32 {
        self.tire(tire).iter().sum::<f32>() / 3.0
    }
}

/// Race flags. `-1` means no data; fields missing from older revisions are
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Flags {
    pub yellow: i32,
    pub yellow_caused_it: Option<i32>,
    pub yellow_overtake: Option<i32>,
    pub blue: i32,
    pub black: i32,
    pub green: Option<i32>,
    pub checkered: Option<i32>,
}

/// DRS state. Legacy revisions only publish `available` and `engaged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DrsState {
    pub equipped: Option<i32>,
    pub available: i32,
    pub num_activations_left: Option<i32>,
    pub engaged: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PushToPass {
    pub available: i32,
    pub engaged: i32,
    pub amount_left: i32,
    pub engaged_time_left: f32,
    pub wait_time_left: f32,
}

/// Pending cut-track penalties by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PenaltyCounts {
    pub drive_through: i32,
    pub stop_and_go: i32,
    pub pit_stop: i32,
    pub time_deduction: i32,
    pub slow_down: i32,
}

impl PenaltyCounts {
    pub fn total(&self) -> i32 {
        self.drive_through + self.stop_and_go + self.pit_stop + self.time_deduction + self.slow_down
    }
}

/// Damage levels, 1.0 = intact, 0.0 = destroyed, -1.0 = not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarDamage {
    pub engine: f32,
    pub transmission: f32,
    pub aerodynamics: f32,
}

/// High precision physics state of the player's car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PlayerData {
    /// Physics ticks since session start (400 per second)
    pub simulation_ticks: i32,
    pub simulation_time: f64,
    pub position: Vec3<f64>,
    pub velocity: Vec3<f64>,
    pub acceleration: Vec3<f64>,
    pub local_acceleration: Vec3<f64>,
    pub orientation: Vec3<f64>,
    pub rotation: Vec3<f64>,
    pub angular_acceleration: Vec3<f64>,
    pub driver_body_acceleration: Vec3<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DriverInfo {
    pub name: String,
    pub car_number: i32,
    pub class_id: i32,
    pub model_id: i32,
    pub team_id: i32,
    pub livery_id: i32,
    pub manufacturer_id: i32,
    pub slot_id: i32,
    pub class_performance_index: i32,
}
