//! Byte layouts of every known `$Race$` revision.
//!
//! All records are packed with 1-byte alignment. Offsets here are the ABI:
//! changing one breaks every reader of that revision.

use super::Field as F;
use super::layout::{FieldSpec as S, Layout};

/// Player block of legacy v1, with compiler padding after the tick counter.
pub static PLAYER_LEGACY_V1: Layout = Layout {
    name: "r3e_playerdata",
    size: 208,
    fields: &[
        S::i32("gameSimulationTicks", F::SimulationTicks, 0),
        S::padding(4, 4),
        S::f64("gameSimulationTime", F::SimulationTime, 8),
        S::f64_array("position", F::WorldPosition, 16, 3),
        S::f64_array("velocity", F::WorldVelocity, 40, 3),
        S::f64_array("acceleration", F::WorldAcceleration, 64, 3),
        S::f64_array("localAcceleration", F::BodyLocalAcceleration, 88, 3),
        S::f64_array("orientation", F::BodyOrientation, 112, 3),
        S::f64_array("rotation", F::BodyRotation, 136, 3),
        S::f64_array("angularAcceleration", F::AngularAcceleration, 160, 3),
        S::f64_array("driverBodyAcceleration", F::DriverBodyAcceleration, 184, 3),
    ],
};

/// Player block from legacy v2 onwards.
pub static PLAYER: Layout = Layout {
    name: "r3e_playerdata",
    size: 208,
    fields: &[
        S::i32("game_simulation_ticks", F::SimulationTicks, 0),
        S::reserved("_padding1", 4, 4),
        S::f64("game_simulation_time", F::SimulationTime, 8),
        S::f64_array("position", F::WorldPosition, 16, 3),
        S::f64_array("velocity", F::WorldVelocity, 40, 3),
        S::f64_array("acceleration", F::WorldAcceleration, 64, 3),
        S::f64_array("local_acceleration", F::BodyLocalAcceleration, 88, 3),
        S::f64_array("orientation", F::BodyOrientation, 112, 3),
        S::f64_array("rotation", F::BodyRotation, 136, 3),
        S::f64_array("angular_acceleration", F::AngularAcceleration, 160, 3),
        S::f64_array("driver_body_acceleration", F::DriverBodyAcceleration, 184, 3),
    ],
};

pub static FLAGS_1_6: Layout = Layout {
    name: "r3e_flags",
    size: 12,
    fields: &[
        S::i32("yellow", F::FlagYellow, 0),
        S::i32("blue", F::FlagBlue, 4),
        S::i32("black", F::FlagBlack, 8),
    ],
};

pub static FLAGS_1_7: Layout = Layout {
    name: "r3e_flags",
    size: 28,
    fields: &[
        S::i32("yellow", F::FlagYellow, 0),
        S::i32("yellow_caused_it", F::FlagYellowCausedIt, 4),
        S::i32("yellow_overtake", F::FlagYellowOvertake, 8),
        S::i32("blue", F::FlagBlue, 12),
        S::i32("black", F::FlagBlack, 16),
        S::i32("green", F::FlagGreen, 20),
        S::i32("checkered", F::FlagCheckered, 24),
    ],
};

pub static DRS: Layout = Layout {
    name: "r3e_drs",
    size: 16,
    fields: &[
        S::i32("equipped", F::DrsEquipped, 0),
        S::i32("available", F::DrsAvailable, 4),
        S::i32("num_activations_left", F::DrsNumActivationsLeft, 8),
        S::i32("engaged", F::DrsEngaged, 12),
    ],
};

pub static PUSH_TO_PASS: Layout = Layout {
    name: "r3e_push_to_pass",
    size: 20,
    fields: &[
        S::i32("available", F::PtpAvailable, 0),
        S::i32("engaged", F::PtpEngaged, 4),
        S::i32("amount_left", F::PtpAmountLeft, 8),
        S::f32("engaged_time_left", F::PtpEngagedTimeLeft, 12),
        S::f32("wait_time_left", F::PtpWaitTimeLeft, 16),
    ],
};

pub static PENALTIES: Layout = Layout {
    name: "r3e_cut_track_penalties",
    size: 20,
    fields: &[
        S::i32("drive_through", F::PenaltyDriveThrough, 0),
        S::i32("stop_and_go", F::PenaltyStopAndGo, 4),
        S::i32("pit_stop", F::PenaltyPitStop, 8),
        S::i32("time_deduction", F::PenaltyTimeDeduction, 12),
        S::i32("slow_down", F::PenaltySlowDown, 16),
    ],
};

pub static CAR_DAMAGE: Layout = Layout {
    name: "r3e_car_damage",
    size: 12,
    fields: &[
        S::f32("engine", F::DamageEngine, 0),
        S::f32("transmission", F::DamageTransmission, 4),
        S::f32("aerodynamics", F::DamageAerodynamics, 8),
    ],
};

pub static DRIVER_INFO: Layout = Layout {
    name: "r3e_driver_info",
    size: 96,
    fields: &[
        S::utf8("name", F::DriverName, 0, 64),
        S::i32("car_number", F::CarNumber, 64),
        S::i32("class_id", F::ClassId, 68),
        S::i32("model_id", F::ModelId, 72),
        S::i32("team_id", F::TeamId, 76),
        S::i32("livery_id", F::LiveryId, 80),
        S::i32("manufacturer_id", F::ManufacturerId, 84),
        S::i32("slot_id", F::SlotId, 88),
        S::i32("class_performance_index", F::ClassPerformanceIndex, 92),
    ],
};

pub static DRIVER_1_6: Layout = Layout {
    name: "r3e_driver_data",
    size: 220,
    fields: &[
        S::composite("driver_info", F::DriverInfo, 0, &DRIVER_INFO),
        S::i32("finish_status", F::FinishStatus, 96),
        S::i32("place", F::Place, 100),
        S::f32("lap_distance", F::LapDistance, 104),
        S::f32_array("position", F::WorldPosition, 108, 3),
        S::i32("track_sector", F::TrackSector, 120),
        S::i32("completed_laps", F::CompletedLaps, 124),
        S::i32("current_lap_valid", F::CurrentLapValid, 128),
        S::f32("lap_time_current_self", F::LapTimeCurrentSelf, 132),
        S::f32_array("sector_time_current_self", F::SectorTimeCurrentSelf, 136, 3),
        S::f32_array("sector_time_previous_self", F::SectorTimePreviousSelf, 148, 3),
        S::f32_array("sector_time_best_self", F::SectorTimeBestSelf, 160, 3),
        S::f32("time_delta_front", F::TimeDeltaFront, 172),
        S::f32("time_delta_behind", F::TimeDeltaBehind, 176),
        S::i32("pitstop_status", F::PitStopStatus, 180),
        S::i32("in_pitlane", F::InPitlane, 184),
        S::i32("num_pitstops", F::NumPitstops, 188),
        S::composite("penalties", F::Penalties, 192, &PENALTIES),
        S::f32("car_speed", F::CarSpeed, 212),
        S::i32("tire_type", F::TireType, 216),
    ],
};

pub static DRIVER_1_7: Layout = Layout {
    name: "r3e_driver_data",
    size: 224,
    fields: &[
        S::composite("driver_info", F::DriverInfo, 0, &DRIVER_INFO),
        S::i32("finish_status", F::FinishStatus, 96),
        S::i32("place", F::Place, 100),
        S::f32("lap_distance", F::LapDistance, 104),
        S::f32_array("position", F::WorldPosition, 108, 3),
        S::i32("track_sector", F::TrackSector, 120),
        S::i32("completed_laps", F::CompletedLaps, 124),
        S::i32("current_lap_valid", F::CurrentLapValid, 128),
        S::f32("lap_time_current_self", F::LapTimeCurrentSelf, 132),
        S::f32_array("sector_time_current_self", F::SectorTimeCurrentSelf, 136, 3),
        S::f32_array("sector_time_previous_self", F::SectorTimePreviousSelf, 148, 3),
        S::f32_array("sector_time_best_self", F::SectorTimeBestSelf, 160, 3),
        S::f32("time_delta_front", F::TimeDeltaFront, 172),
        S::f32("time_delta_behind", F::TimeDeltaBehind, 176),
        S::i32("pitstop_status", F::PitStopStatus, 180),
        S::i32("in_pitlane", F::InPitlane, 184),
        S::i32("num_pitstops", F::NumPitstops, 188),
        S::composite("penalties", F::Penalties, 192, &PENALTIES),
        S::f32("car_speed", F::CarSpeed, 212),
        S::i32("tire_type_front", F::TireTypeFront, 216),
        S::i32("tire_type_rear", F::TireTypeRear, 220),
    ],
};

/// Original camelCase layout with natural C alignment.
pub static LEGACY_V1: Layout = Layout {
    name: "r3e_shared",
    size: 400,
    fields: &[
        S::f32_array("userInput", F::UserInput, 0, 6),
        S::f32("engineRps", F::EngineRps, 24),
        S::f32("maxEngineRps", F::MaxEngineRps, 28),
        S::f32("fuelPressure", F::FuelPressure, 32),
        S::f32("fuelLeft", F::FuelLeft, 36),
        S::f32("fuelCapacity", F::FuelCapacity, 40),
        S::f32("engineWaterTemp", F::EngineWaterTemp, 44),
        S::f32("engineOilTemp", F::EngineOilTemp, 48),
        S::f32("engineOilPressure", F::EngineOilPressure, 52),
        S::f32("carSpeed", F::CarSpeed, 56),
        S::i32("numberOfLaps", F::NumberOfLaps, 60),
        S::i32("completedLaps", F::CompletedLaps, 64),
        S::f32("lapTimeBest", F::LapTimeBest, 68),
        S::f32("lapTimePrevious", F::LapTimePrevious, 72),
        S::f32("lapTimeCurrent", F::LapTimeCurrent, 76),
        S::i32("position", F::Position, 80),
        S::i32("numCars", F::NumCars, 84),
        S::i32("gear", F::Gear, 88),
        S::f32_array("tireTemp", F::TireTemps, 92, 12),
        S::i32("numPenalties", F::NumPenalties, 140),
        S::f32_array("carCgLoc", F::CarCgLocation, 144, 3),
        S::f32_array("carOrientation", F::CarOrientation, 156, 3),
        S::f32_array("localAcceleration", F::LocalAcceleration, 168, 3),
        S::i32("drsAvailable", F::DrsAvailable, 180),
        S::i32("drsEngaged", F::DrsEngaged, 184),
        S::padding(188, 4),
        S::composite("player", F::Player, 192, &PLAYER_LEGACY_V1),
    ],
};

/// Packed snake_case layout, byte-identical to v1.
pub static LEGACY_V2: Layout = Layout {
    name: "r3e_shared",
    size: 400,
    fields: &[
        S::f32_array("user_input", F::UserInput, 0, 6),
        S::f32("engine_rps", F::EngineRps, 24),
        S::f32("max_engine_rps", F::MaxEngineRps, 28),
        S::f32("fuel_pressure", F::FuelPressure, 32),
        S::f32("fuel_left", F::FuelLeft, 36),
        S::f32("fuel_capacity", F::FuelCapacity, 40),
        S::f32("engine_water_temp", F::EngineWaterTemp, 44),
        S::f32("engine_oil_temp", F::EngineOilTemp, 48),
        S::f32("engine_oil_pressure", F::EngineOilPressure, 52),
        S::f32("car_speed", F::CarSpeed, 56),
        S::i32("number_of_laps", F::NumberOfLaps, 60),
        S::i32("completed_laps", F::CompletedLaps, 64),
        S::f32("lap_time_best", F::LapTimeBest, 68),
        S::f32("lap_time_previous", F::LapTimePrevious, 72),
        S::f32("lap_time_current", F::LapTimeCurrent, 76),
        S::i32("position", F::Position, 80),
        S::i32("num_cars", F::NumCars, 84),
        S::i32("gear", F::Gear, 88),
        S::f32_array("tire_temps", F::TireTemps, 92, 12),
        S::i32("num_penalties", F::NumPenalties, 140),
        S::f32_array("car_cg_location", F::CarCgLocation, 144, 3),
        S::f32_array("car_orientation", F::CarOrientation, 156, 3),
        S::f32_array("local_acceleration", F::LocalAcceleration, 168, 3),
        S::i32("drs_available", F::DrsAvailable, 180),
        S::i32("drs_engaged", F::DrsEngaged, 184),
        S::reserved("_padding1", 188, 4),
        S::composite("player", F::Player, 192, &PLAYER),
    ],
};

pub static R3E_1_6: Layout = Layout {
    name: "r3e_shared",
    size: 14672,
    fields: &[
        S::i32("version_major", F::VersionMajor, 0),
        S::i32("version_minor", F::VersionMinor, 4),
        S::i32("all_drivers_offset", F::AllDriversOffset, 8),
        S::i32("driver_data_size", F::DriverDataSize, 12),
        S::i32("game_paused", F::GamePaused, 16),
        S::i32("game_in_menus", F::GameInMenus, 20),
        S::composite("player", F::Player, 24, &PLAYER),
        S::utf8("track_name", F::TrackName, 232, 64),
        S::utf8("layout_name", F::LayoutName, 296, 64),
        S::i32("track_id", F::TrackId, 360),
        S::i32("layout_id", F::LayoutId, 364),
        S::f32("layout_length", F::LayoutLength, 368),
        S::i32("session_type", F::SessionType, 372),
        S::i32("session_phase", F::SessionPhase, 376),
        S::i32("number_of_laps", F::NumberOfLaps, 380),
        S::f32("session_time_remaining", F::SessionTimeRemaining, 384),
        S::i32("position", F::Position, 388),
        S::i32("num_cars", F::NumCars, 392),
        S::i32("completed_laps", F::CompletedLaps, 396),
        S::f32("lap_time_best", F::LapTimeBest, 400),
        S::f32("lap_time_previous", F::LapTimePrevious, 404),
        S::f32("lap_time_current", F::LapTimeCurrent, 408),
        S::composite("flags", F::Flags, 412, &FLAGS_1_6),
        S::i32("num_penalties", F::NumPenalties, 424),
        S::f32("car_speed", F::CarSpeed, 428),
        S::f32("engine_rps", F::EngineRps, 432),
        S::f32("max_engine_rps", F::MaxEngineRps, 436),
        S::i32("gear", F::Gear, 440),
        S::f32("fuel_left", F::FuelLeft, 444),
        S::f32("fuel_capacity", F::FuelCapacity, 448),
        S::f32("fuel_pressure", F::FuelPressure, 452),
        S::f32("engine_water_temp", F::EngineWaterTemp, 456),
        S::f32("engine_oil_temp", F::EngineOilTemp, 460),
        S::f32("engine_oil_pressure", F::EngineOilPressure, 464),
        S::f32("throttle", F::Throttle, 468),
        S::f32("brake", F::Brake, 472),
        S::f32("clutch", F::Clutch, 476),
        S::f32_array("tire_temps", F::TireTemps, 480, 12),
        S::composite("drs", F::Drs, 528, &DRS),
        S::f32_array("car_cg_location", F::CarCgLocation, 544, 3),
        S::f32_array("car_orientation", F::CarOrientation, 556, 3),
        S::f32_array("local_acceleration", F::LocalAcceleration, 568, 3),
        S::composite("car_damage", F::CarDamage, 580, &CAR_DAMAGE),
        S::composite_array("all_drivers_data", F::Drivers, 592, &DRIVER_1_6, 64),
    ],
};

pub static R3E_1_7: Layout = Layout {
    name: "r3e_shared",
    size: 29320,
    fields: &[
        S::i32("version_major", F::VersionMajor, 0),
        S::i32("version_minor", F::VersionMinor, 4),
        S::i32("all_drivers_offset", F::AllDriversOffset, 8),
        S::i32("driver_data_size", F::DriverDataSize, 12),
        S::i32("game_paused", F::GamePaused, 16),
        S::i32("game_in_menus", F::GameInMenus, 20),
        S::i32("game_in_replay", F::GameInReplay, 24),
        S::composite("player", F::Player, 28, &PLAYER),
        S::utf8("track_name", F::TrackName, 236, 64),
        S::utf8("layout_name", F::LayoutName, 300, 64),
        S::i32("track_id", F::TrackId, 364),
        S::i32("layout_id", F::LayoutId, 368),
        S::f32("layout_length", F::LayoutLength, 372),
        S::i32("session_type", F::SessionType, 376),
        S::i32("session_phase", F::SessionPhase, 380),
        S::i32("number_of_laps", F::NumberOfLaps, 384),
        S::f32("session_time_remaining", F::SessionTimeRemaining, 388),
        S::i32("position", F::Position, 392),
        S::i32("num_cars", F::NumCars, 396),
        S::i32("completed_laps", F::CompletedLaps, 400),
        S::f32("lap_time_best", F::LapTimeBest, 404),
        S::f32("lap_time_previous", F::LapTimePrevious, 408),
        S::f32("lap_time_current", F::LapTimeCurrent, 412),
        S::composite("flags", F::Flags, 416, &FLAGS_1_7),
        S::i32("num_penalties", F::NumPenalties, 444),
        S::composite("penalties", F::Penalties, 448, &PENALTIES),
        S::f32("car_speed", F::CarSpeed, 468),
        S::f32("engine_rps", F::EngineRps, 472),
        S::f32("max_engine_rps", F::MaxEngineRps, 476),
        S::i32("gear", F::Gear, 480),
        S::f32("fuel_left", F::FuelLeft, 484),
        S::f32("fuel_capacity", F::FuelCapacity, 488),
        S::f32("engine_water_temp", F::EngineWaterTemp, 492),
        S::f32("engine_oil_temp", F::EngineOilTemp, 496),
        S::f32("engine_oil_pressure", F::EngineOilPressure, 500),
        S::f32("throttle", F::Throttle, 504),
        S::f32("brake", F::Brake, 508),
        S::f32("clutch", F::Clutch, 512),
        S::f32_array("tire_temps", F::TireTemps, 516, 12),
        S::composite("drs", F::Drs, 564, &DRS),
        S::composite("push_to_pass", F::PushToPass, 580, &PUSH_TO_PASS),
        S::f32_array("car_cg_location", F::CarCgLocation, 600, 3),
        S::f32_array("car_orientation", F::CarOrientation, 612, 3),
        S::f32_array("local_acceleration", F::LocalAcceleration, 624, 3),
        S::composite("car_damage", F::CarDamage, 636, &CAR_DAMAGE),
        S::composite_array("all_drivers_data", F::Drivers, 648, &DRIVER_1_7, 128),
    ],
};
