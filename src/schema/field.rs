//! Semantic field identifiers and field types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sentinel::Sentinel;

/// Storage type of a field in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum FieldType {
    /// 32-bit two's complement integer
    Int32,
    /// 32-bit IEEE-754 float
    Float32,
    /// 64-bit IEEE-754 float
    Float64,
    /// Fixed-size, NUL-terminated UTF-8 byte array
    Utf8,
    /// Nested fixed-size group described by its own layout
    Composite,
    /// Filler declared in the layout to keep offsets stable
    Reserved,
    /// Alignment padding inserted by the C compiler (legacy v1 only)
    Padding,
}

impl FieldType {
    /// Byte width of scalar types, `None` for variable-width types.
    pub const fn scalar_size(self) -> Option<usize> {
        match self {
            FieldType::Int32 | FieldType::Float32 => Some(4),
            FieldType::Float64 => Some(8),
            FieldType::Utf8 | FieldType::Composite | FieldType::Reserved | FieldType::Padding => {
                None
            }
        }
    }

    /// Whether the field carries data (as opposed to filler).
    pub const fn is_data(self) -> bool {
        !matches!(self, FieldType::Reserved | FieldType::Padding)
    }
}

/// Revision-independent name of a telemetry field.
///
/// The same `Field` can live at different offsets in different revisions;
/// the schema table maps it per revision. Units and "no data" conventions
/// are documented per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Field {
    // Version header (tagged revisions only)
    VersionMajor,
    VersionMinor,
    /// Byte offset of the driver array inside the record
    AllDriversOffset,
    /// Byte size of one driver array entry
    DriverDataSize,
    GamePaused,
    GameInMenus,
    GameInReplay,

    /// Deprecated raw inputs, no longer written by the producer
    UserInput,

    // Engine and fuel
    /// Unit: rad/s
    EngineRps,
    /// Unit: rad/s
    MaxEngineRps,
    /// Unit: kPa. Removed in 1.7
    FuelPressure,
    /// Unit: liters
    FuelLeft,
    /// Unit: liters
    FuelCapacity,
    /// Unit: Kelvin
    EngineWaterTemp,
    /// Unit: Kelvin
    EngineOilTemp,
    /// Unit: kPa
    EngineOilPressure,
    /// Unit: m/s
    CarSpeed,

    // Race progress
    /// Total laps in the race, -1 outside race mode
    NumberOfLaps,
    /// Laps completed, -1 = n/a
    CompletedLaps,
    /// Unit: seconds, -1.0 = none
    LapTimeBest,
    /// Unit: seconds, -1.0 = none
    LapTimePrevious,
    /// Unit: seconds, -1.0 = none
    LapTimeCurrent,
    /// Race position, 1 = first place
    Position,
    /// Number of cars including the player
    NumCars,
    /// -2 = no data, -1 = reverse, 0 = neutral, 1.. = forward gears
    Gear,
    /// Unit: Kelvin, 4 tires x 3 tread points
    TireTemps,
    /// Penalties pending for the player
    NumPenalties,

    // Car body (single precision)
    /// World-space center of gravity (Y = up)
    CarCgLocation,
    /// Pitch, yaw, roll in radians
    CarOrientation,
    /// Unit: m/s^2, +X = left, +Y = up, +Z = back
    LocalAcceleration,

    // DRS
    Drs,
    DrsEquipped,
    /// -1 = no data, 0 = not available, 1 = available
    DrsAvailable,
    DrsNumActivationsLeft,
    /// -1 = no data, 0 = not engaged, 1 = engaged
    DrsEngaged,

    // Player high precision block
    Player,
    /// Unit: ticks (1/400 s)
    SimulationTicks,
    /// Unit: seconds
    SimulationTime,
    WorldPosition,
    /// Unit: m/s
    WorldVelocity,
    /// Unit: m/s^2
    WorldAcceleration,
    /// Unit: m/s^2
    BodyLocalAcceleration,
    /// Euler angles
    BodyOrientation,
    BodyRotation,
    AngularAcceleration,
    DriverBodyAcceleration,

    // Session
    TrackName,
    LayoutName,
    TrackId,
    LayoutId,
    /// Unit: meters
    LayoutLength,
    SessionType,
    SessionPhase,
    /// Unit: seconds, -1.0 = n/a
    SessionTimeRemaining,

    // Flags
    Flags,
    FlagYellow,
    FlagYellowCausedIt,
    FlagYellowOvertake,
    FlagBlue,
    FlagBlack,
    FlagGreen,
    FlagCheckered,

    // Penalty counts
    Penalties,
    PenaltyDriveThrough,
    PenaltyStopAndGo,
    PenaltyPitStop,
    PenaltyTimeDeduction,
    PenaltySlowDown,

    // Pedals, 0.0..=1.0
    Throttle,
    Brake,
    Clutch,

    // Push to pass
    PushToPass,
    PtpAvailable,
    PtpEngaged,
    PtpAmountLeft,
    /// Unit: seconds
    PtpEngagedTimeLeft,
    /// Unit: seconds
    PtpWaitTimeLeft,

    // Damage, 0.0 = destroyed, 1.0 = intact, -1.0 = n/a
    CarDamage,
    DamageEngine,
    DamageTransmission,
    DamageAerodynamics,

    // Per-driver records
    Drivers,
    DriverInfo,
    DriverName,
    CarNumber,
    ClassId,
    ModelId,
    TeamId,
    LiveryId,
    ManufacturerId,
    SlotId,
    ClassPerformanceIndex,
    FinishStatus,
    /// 1 = first place
    Place,
    /// Unit: meters along the lap
    LapDistance,
    TrackSector,
    CurrentLapValid,
    /// Unit: seconds, -1.0 = none
    LapTimeCurrentSelf,
    SectorTimeCurrentSelf,
    SectorTimePreviousSelf,
    SectorTimeBestSelf,
    /// Unit: seconds, -1.0 = n/a
    TimeDeltaFront,
    /// Unit: seconds, -1.0 = n/a
    TimeDeltaBehind,
    PitStopStatus,
    InPitlane,
    NumPitstops,
    TireType,
    TireTypeFront,
    TireTypeRear,
}

impl Field {
    /// Stable snake_case name, independent of any revision's spelling.
    pub fn name(self) -> &'static str {
        match self {
            Field::VersionMajor => "version_major",
            Field::VersionMinor => "version_minor",
            Field::AllDriversOffset => "all_drivers_offset",
            Field::DriverDataSize => "driver_data_size",
            Field::GamePaused => "game_paused",
            Field::GameInMenus => "game_in_menus",
            Field::GameInReplay => "game_in_replay",
            Field::UserInput => "user_input",
            Field::EngineRps => "engine_rps",
            Field::MaxEngineRps => "max_engine_rps",
            Field::FuelPressure => "fuel_pressure",
            Field::FuelLeft => "fuel_left",
            Field::FuelCapacity => "fuel_capacity",
            Field::EngineWaterTemp => "engine_water_temp",
            Field::EngineOilTemp => "engine_oil_temp",
            Field::EngineOilPressure => "engine_oil_pressure",
            Field::CarSpeed => "car_speed",
            Field::NumberOfLaps => "number_of_laps",
            Field::CompletedLaps => "completed_laps",
            Field::LapTimeBest => "lap_time_best",
            Field::LapTimePrevious => "lap_time_previous",
            Field::LapTimeCurrent => "lap_time_current",
            Field::Position => "position",
            Field::NumCars => "num_cars",
            Field::Gear => "gear",
            Field::TireTemps => "tire_temps",
            Field::NumPenalties => "num_penalties",
            Field::CarCgLocation => "car_cg_location",
            Field::CarOrientation => "car_orientation",
            Field::LocalAcceleration => "local_acceleration",
            Field::Drs => "drs",
            Field::DrsEquipped => "drs_equipped",
            Field::DrsAvailable => "drs_available",
            Field::DrsNumActivationsLeft => "drs_num_activations_left",
            Field::DrsEngaged => "drs_engaged",
            Field::Player => "player",
            Field::SimulationTicks => "simulation_ticks",
            Field::SimulationTime => "simulation_time",
            Field::WorldPosition => "world_position",
            Field::WorldVelocity => "world_velocity",
            Field::WorldAcceleration => "world_acceleration",
            Field::BodyLocalAcceleration => "body_local_acceleration",
            Field::BodyOrientation => "body_orientation",
            Field::BodyRotation => "body_rotation",
            Field::AngularAcceleration => "angular_acceleration",
            Field::DriverBodyAcceleration => "driver_body_acceleration",
            Field::TrackName => "track_name",
            Field::LayoutName => "layout_name",
            Field::TrackId => "track_id",
            Field::LayoutId => "layout_id",
            Field::LayoutLength => "layout_length",
            Field::SessionType => "session_type",
            Field::SessionPhase => "session_phase",
            Field::SessionTimeRemaining => "session_time_remaining",
            Field::Flags => "flags",
            Field::FlagYellow => "flag_yellow",
            Field::FlagYellowCausedIt => "flag_yellow_caused_it",
            Field::FlagYellowOvertake => "flag_yellow_overtake",
            Field::FlagBlue => "flag_blue",
            Field::FlagBlack => "flag_black",
            Field::FlagGreen => "flag_green",
            Field::FlagCheckered => "flag_checkered",
            Field::Penalties => "penalties",
            Field::PenaltyDriveThrough => "penalty_drive_through",
            Field::PenaltyStopAndGo => "penalty_stop_and_go",
            Field::PenaltyPitStop => "penalty_pit_stop",
            Field::PenaltyTimeDeduction => "penalty_time_deduction",
            Field::PenaltySlowDown => "penalty_slow_down",
            Field::Throttle => "throttle",
            Field::Brake => "brake",
            Field::Clutch => "clutch",
            Field::PushToPass => "push_to_pass",
            Field::PtpAvailable => "ptp_available",
            Field::PtpEngaged => "ptp_engaged",
            Field::PtpAmountLeft => "ptp_amount_left",
            Field::PtpEngagedTimeLeft => "ptp_engaged_time_left",
            Field::PtpWaitTimeLeft => "ptp_wait_time_left",
            Field::CarDamage => "car_damage",
            Field::DamageEngine => "damage_engine",
            Field::DamageTransmission => "damage_transmission",
            Field::DamageAerodynamics => "damage_aerodynamics",
            Field::Drivers => "drivers",
            Field::DriverInfo => "driver_info",
            Field::DriverName => "driver_name",
            Field::CarNumber => "car_number",
            Field::ClassId => "class_id",
            Field::ModelId => "model_id",
            Field::TeamId => "team_id",
            Field::LiveryId => "livery_id",
            Field::ManufacturerId => "manufacturer_id",
            Field::SlotId => "slot_id",
            Field::ClassPerformanceIndex => "class_performance_index",
            Field::FinishStatus => "finish_status",
            Field::Place => "place",
            Field::LapDistance => "lap_distance",
            Field::TrackSector => "track_sector",
            Field::CurrentLapValid => "current_lap_valid",
            Field::LapTimeCurrentSelf => "lap_time_current_self",
            Field::SectorTimeCurrentSelf => "sector_time_current_self",
            Field::SectorTimePreviousSelf => "sector_time_previous_self",
            Field::SectorTimeBestSelf => "sector_time_best_self",
            Field::TimeDeltaFront => "time_delta_front",
            Field::TimeDeltaBehind => "time_delta_behind",
            Field::PitStopStatus => "pit_stop_status",
            Field::InPitlane => "in_pitlane",
            Field::NumPitstops => "num_pitstops",
            Field::TireType => "tire_type",
            Field::TireTypeFront => "tire_type_front",
            Field::TireTypeRear => "tire_type_rear",
        }
    }

    /// The "no data" convention the producer uses for this field, if any.
    ///
    /// The decoder never applies it; see [`crate::sentinel`].
    pub fn sentinel(self) -> Option<Sentinel> {
        match self {
            Field::Gear => Some(Sentinel::NoData),
            Field::EngineRps
            | Field::NumberOfLaps
            | Field::CompletedLaps
            | Field::LapTimeBest
            | Field::LapTimePrevious
            | Field::LapTimeCurrent
            | Field::DrsAvailable
            | Field::DrsEngaged
            | Field::DrsEquipped
            | Field::DrsNumActivationsLeft
            | Field::SessionTimeRemaining
            | Field::FlagYellow
            | Field::FlagYellowCausedIt
            | Field::FlagYellowOvertake
            | Field::FlagBlue
            | Field::FlagBlack
            | Field::FlagGreen
            | Field::FlagCheckered
            | Field::PtpAvailable
            | Field::PtpEngaged
            | Field::PtpAmountLeft
            | Field::PtpEngagedTimeLeft
            | Field::PtpWaitTimeLeft
            | Field::DamageEngine
            | Field::DamageTransmission
            | Field::DamageAerodynamics
            | Field::LapTimeCurrentSelf
            | Field::TimeDeltaFront
            | Field::TimeDeltaBehind
            | Field::TireType
            | Field::TireTypeFront
            | Field::TireTypeRear => Some(Sentinel::NotApplicable),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
