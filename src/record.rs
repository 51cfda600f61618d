//! Read-only views over telemetry snapshots
//!
//! A [`TelemetryRecord`] binds a byte slice to one row of the schema table.
//! Every accessor dispatches through that row, so the same call works on any
//! revision: it returns the value at the revision's offset, or
//! [`DecodeError::FieldNotSupported`] when the revision does not have the
//! field. Values are returned raw, sentinels included.

use tracing::warn;

use crate::error::{DecodeError, DecodeResult};
use crate::schema::{Field, FieldSpec, Layout, SchemaEntry, SchemaVersion};
use crate::types::{
    CarDamage, DriverInfo, DrsState, FieldData, FieldLocation, Flags, Orientation, PenaltyCounts,
    PlayerData, PushToPass, Scalar, TireLocation, TireTemps, TreadLocation, Value, Vec3,
    read_scalar,
};

/// A layout placed at a base offset inside a buffer.
#[derive(Debug, Clone, Copy)]
struct View<'a> {
    data: &'a [u8],
    base: usize,
    layout: &'static Layout,
    version: SchemaVersion,
}

impl<'a> View<'a> {
    fn locate(&self, field: Field) -> DecodeResult<FieldLocation> {
        self.layout
            .resolve(field)
            .map(|(offset, spec)| FieldLocation { field, offset: self.base + offset, spec })
            .ok_or(DecodeError::FieldNotSupported { field, version: self.version })
    }

    fn get<T: FieldData>(&self, field: Field) -> DecodeResult<T> {
        T::from_field(self.data, &self.locate(field)?)
    }

    fn optional<T: FieldData>(&self, field: Field) -> DecodeResult<Option<T>> {
        match self.get(field) {
            Ok(value) => Ok(Some(value)),
            Err(DecodeError::FieldNotSupported { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn element<T: Scalar + FieldData>(&self, field: Field, index: usize) -> DecodeResult<T> {
        let loc = self.locate(field)?;
        if loc.spec.ty != T::TYPE {
            return Err(loc.mismatch::<T>());
        }
        read_scalar(self.data, loc.element(index)?.offset)
    }

    fn value(&self, field: Field) -> DecodeResult<Value> {
        Value::from_field(self.data, &self.locate(field)?)
    }

    fn value_by_name(&self, name: &str) -> DecodeResult<Option<Value>> {
        match self.layout.field_by_name(name) {
            Some((offset, spec)) => {
                let Some(field) = spec.field else { return Ok(None) };
                let loc = FieldLocation { field, offset: self.base + offset, spec };
                Value::from_field(self.data, &loc).map(Some)
            }
            None => Ok(None),
        }
    }

    fn fields(&self) -> impl Iterator<Item = (Field, &'static FieldSpec)> + use<> {
        self.layout.flatten().into_iter().filter_map(|(_, spec)| spec.field.map(|f| (f, spec)))
    }
}

/// A decoded telemetry snapshot bound to its schema revision.
///
/// Constructed by [`crate::decode`]; the buffer is checked against the
/// revision's size once, so accessors only fail for schema reasons.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryRecord<'a> {
    view: View<'a>,
    entry: &'static SchemaEntry,
}

impl<'a> TelemetryRecord<'a> {
    pub(crate) fn from_entry(data: &'a [u8], entry: &'static SchemaEntry) -> DecodeResult<Self> {
        if data.len() < entry.size() {
            return Err(DecodeError::BufferTooSmall { required: entry.size(), actual: data.len() });
        }
        Ok(Self::from_validated(data, entry))
    }

    /// Caller guarantees `data` covers `entry`'s size.
    pub(crate) fn from_validated(data: &'a [u8], entry: &'static SchemaEntry) -> Self {
        let view = View { data, base: 0, layout: entry.layout, version: entry.version };
        Self { view, entry }
    }

    pub fn version(&self) -> SchemaVersion {
        self.entry.version
    }

    pub fn entry(&self) -> &'static SchemaEntry {
        self.entry
    }

    /// The bytes this record reads from, exactly one revision's size.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.view.data.get(..self.entry.size()).unwrap_or(self.view.data)
    }

    /// Whether the bound revision has `field`.
    pub fn supports(&self, field: Field) -> bool {
        self.entry.supports(field)
    }

    /// Resolve a field to its location in this record.
    pub fn locate(&self, field: Field) -> DecodeResult<FieldLocation> {
        self.view.locate(field)
    }

    /// Read a field as `T`.
    pub fn get<T: FieldData>(&self, field: Field) -> DecodeResult<T> {
        self.view.get(field)
    }

    /// Read a field as `T`, `None` when the revision does not have it.
    pub fn optional<T: FieldData>(&self, field: Field) -> DecodeResult<Option<T>> {
        self.view.optional(field)
    }

    /// Read one element of an array field.
    pub fn element<T: Scalar + FieldData>(&self, field: Field, index: usize) -> DecodeResult<T> {
        self.view.element(field, index)
    }

    pub fn value(&self, field: Field) -> DecodeResult<Value> {
        self.view.value(field)
    }

    /// Look a field up by the name the revision declares (`engineRps` in
    /// legacy v1, `engine_rps` later). `None` when no field has that name.
    pub fn value_by_name(&self, name: &str) -> DecodeResult<Option<Value>> {
        self.view.value_by_name(name)
    }

    /// Every field of the bound revision's top-level scope.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &'static FieldSpec)> + use<'a> {
        self.view.fields()
    }

    pub fn tire_temperature(&self, tire: TireLocation, tread: TreadLocation) -> DecodeResult<f32> {
        self.element(Field::TireTemps, TireTemps::element_index(tire, tread))
    }

    pub fn player(&self) -> DecodeResult<PlayerData> {
        Ok(PlayerData {
            simulation_ticks: self.get(Field::SimulationTicks)?,
            simulation_time: self.get(Field::SimulationTime)?,
            position: self.get(Field::WorldPosition)?,
            velocity: self.get(Field::WorldVelocity)?,
            acceleration: self.get(Field::WorldAcceleration)?,
            local_acceleration: self.get(Field::BodyLocalAcceleration)?,
            orientation: self.get(Field::BodyOrientation)?,
            rotation: self.get(Field::BodyRotation)?,
            angular_acceleration: self.get(Field::AngularAcceleration)?,
            driver_body_acceleration: self.get(Field::DriverBodyAcceleration)?,
        })
    }

    pub fn flags(&self) -> DecodeResult<Flags> {
        self.view.locate(Field::Flags)?;
        Ok(Flags {
            yellow: self.get(Field::FlagYellow)?,
            yellow_caused_it: self.optional(Field::FlagYellowCausedIt)?,
            yellow_overtake: self.optional(Field::FlagYellowOvertake)?,
            blue: self.get(Field::FlagBlue)?,
            black: self.get(Field::FlagBlack)?,
            green: self.optional(Field::FlagGreen)?,
            checkered: self.optional(Field::FlagCheckered)?,
        })
    }

    /// DRS state; works on every revision.
    pub fn drs(&self) -> DecodeResult<DrsState> {
        Ok(DrsState {
            equipped: self.optional(Field::DrsEquipped)?,
            available: self.get(Field::DrsAvailable)?,
            num_activations_left: self.optional(Field::DrsNumActivationsLeft)?,
            engaged: self.get(Field::DrsEngaged)?,
        })
    }

    pub fn push_to_pass(&self) -> DecodeResult<PushToPass> {
        self.view.locate(Field::PushToPass)?;
        Ok(PushToPass {
            available: self.get(Field::PtpAvailable)?,
            engaged: self.get(Field::PtpEngaged)?,
            amount_left: self.get(Field::PtpAmountLeft)?,
            engaged_time_left: self.get(Field::PtpEngagedTimeLeft)?,
            wait_time_left: self.get(Field::PtpWaitTimeLeft)?,
        })
    }

    /// The player's pending penalties by kind.
    pub fn penalties(&self) -> DecodeResult<PenaltyCounts> {
        self.view.locate(Field::Penalties)?;
        read_penalties(&self.view)
    }

    pub fn car_damage(&self) -> DecodeResult<CarDamage> {
        self.view.locate(Field::CarDamage)?;
        Ok(CarDamage {
            engine: self.get(Field::DamageEngine)?,
            transmission: self.get(Field::DamageTransmission)?,
            aerodynamics: self.get(Field::DamageAerodynamics)?,
        })
    }

    /// Maximum number of driver slots of the bound revision.
    pub fn num_drivers_max(&self) -> usize {
        self.entry.num_drivers_max()
    }

    /// The driver in `slot`, `None` past the last slot of the revision.
    pub fn driver(&self, slot: usize) -> DecodeResult<Option<DriverRecord<'a>>> {
        let loc = self.view.locate(Field::Drivers)?;
        if slot >= loc.spec.count {
            return Ok(None);
        }
        let layout = loc
            .spec
            .nested
            .ok_or(DecodeError::FieldNotSupported { field: Field::Drivers, version: self.version() })?;
        let view = View {
            data: self.view.data,
            base: loc.element(slot)?.offset,
            layout,
            version: self.version(),
        };
        Ok(Some(DriverRecord { view, slot }))
    }

    /// Drivers in the occupied slots (`0..num_cars`, clamped to the maximum).
    pub fn drivers(&self) -> DecodeResult<impl Iterator<Item = DriverRecord<'a>> + use<'a>> {
        self.view.locate(Field::Drivers)?;
        let occupied = usize::try_from(self.num_cars()?).unwrap_or(0).min(self.num_drivers_max());
        let record = *self;
        Ok((0..occupied).filter_map(move |slot| record.driver(slot).ok().flatten()))
    }

    /// Compare the driver array position embedded in a tagged header with the
    /// schema table. Logs a warning and returns `false` on mismatch; the
    /// table stays authoritative either way.
    pub fn header_matches_table(&self) -> bool {
        if !self.version().is_tagged() {
            return true;
        }
        let Ok(loc) = self.view.locate(Field::Drivers) else { return true };
        let (Ok(offset), Ok(size)) = (self.all_drivers_offset(), self.driver_data_size()) else {
            return true;
        };
        let matches = usize::try_from(offset).is_ok_and(|o| o == loc.offset)
            && usize::try_from(size).is_ok_and(|s| s == loc.spec.width);
        if !matches {
            warn!(
                version = %self.version(),
                header_offset = offset,
                header_size = size,
                table_offset = loc.offset,
                table_size = loc.spec.width,
                "Driver array header disagrees with schema table"
            );
        }
        matches
    }
}

fn read_penalties(view: &View<'_>) -> DecodeResult<PenaltyCounts> {
    Ok(PenaltyCounts {
        drive_through: view.get(Field::PenaltyDriveThrough)?,
        stop_and_go: view.get(Field::PenaltyStopAndGo)?,
        pit_stop: view.get(Field::PenaltyPitStop)?,
        time_deduction: view.get(Field::PenaltyTimeDeduction)?,
        slow_down: view.get(Field::PenaltySlowDown)?,
    })
}

macro_rules! field_accessors {
    ($record:ident { $( $(#[$meta:meta])* $name:ident: $ty:ty => $field:ident ),* $(,)? }) => {
        impl<'a> $record<'a> {
            $(
                $(#[$meta])*
                pub fn $name(&self) -> DecodeResult<$ty> {
                    self.view.get(Field::$field)
                }
            )*
        }
    };
}

field_accessors!(TelemetryRecord {
    version_major: i32 => VersionMajor,
    version_minor: i32 => VersionMinor,
    all_drivers_offset: i32 => AllDriversOffset,
    driver_data_size: i32 => DriverDataSize,
    game_paused: i32 => GamePaused,
    game_in_menus: i32 => GameInMenus,
    game_in_replay: i32 => GameInReplay,
    /// Deprecated, not written by current producers
    user_input: [f32; 6] => UserInput,
    /// Radians per second
    engine_rps: f32 => EngineRps,
    max_engine_rps: f32 => MaxEngineRps,
    fuel_pressure: f32 => FuelPressure,
    fuel_left: f32 => FuelLeft,
    fuel_capacity: f32 => FuelCapacity,
    engine_water_temp: f32 => EngineWaterTemp,
    engine_oil_temp: f32 => EngineOilTemp,
    engine_oil_pressure: f32 => EngineOilPressure,
    /// Meters per second
    car_speed: f32 => CarSpeed,
    number_of_laps: i32 => NumberOfLaps,
    completed_laps: i32 => CompletedLaps,
    lap_time_best: f32 => LapTimeBest,
    lap_time_previous: f32 => LapTimePrevious,
    lap_time_current: f32 => LapTimeCurrent,
    position: i32 => Position,
    num_cars: i32 => NumCars,
    /// Raw gear, see [`crate::sentinel::Gear`]
    gear: i32 => Gear,
    tire_temps: TireTemps => TireTemps,
    num_penalties: i32 => NumPenalties,
    car_cg_location: Vec3<f32> => CarCgLocation,
    car_orientation: Orientation<f32> => CarOrientation,
    local_acceleration: Vec3<f32> => LocalAcceleration,
    simulation_ticks: i32 => SimulationTicks,
    simulation_time: f64 => SimulationTime,
    track_name: String => TrackName,
    layout_name: String => LayoutName,
    track_id: i32 => TrackId,
    layout_id: i32 => LayoutId,
    layout_length: f32 => LayoutLength,
    session_type: i32 => SessionType,
    session_phase: i32 => SessionPhase,
    session_time_remaining: f32 => SessionTimeRemaining,
    throttle: f32 => Throttle,
    brake: f32 => Brake,
    clutch: f32 => Clutch,
});

/// One slot of the driver array.
#[derive(Debug, Clone, Copy)]
pub struct DriverRecord<'a> {
    view: View<'a>,
    slot: usize,
}

impl<'a> DriverRecord<'a> {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn version(&self) -> SchemaVersion {
        self.view.version
    }

    pub fn supports(&self, field: Field) -> bool {
        self.view.layout.resolve(field).is_some()
    }

    pub fn get<T: FieldData>(&self, field: Field) -> DecodeResult<T> {
        self.view.get(field)
    }

    pub fn optional<T: FieldData>(&self, field: Field) -> DecodeResult<Option<T>> {
        self.view.optional(field)
    }

    pub fn element<T: Scalar + FieldData>(&self, field: Field, index: usize) -> DecodeResult<T> {
        self.view.element(field, index)
    }

    pub fn value(&self, field: Field) -> DecodeResult<Value> {
        self.view.value(field)
    }

    pub fn value_by_name(&self, name: &str) -> DecodeResult<Option<Value>> {
        self.view.value_by_name(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &'static FieldSpec)> + use<'a> {
        self.view.fields()
    }

    pub fn info(&self) -> DecodeResult<DriverInfo> {
        Ok(DriverInfo {
            name: self.get(Field::DriverName)?,
            car_number: self.get(Field::CarNumber)?,
            class_id: self.get(Field::ClassId)?,
            model_id: self.get(Field::ModelId)?,
            team_id: self.get(Field::TeamId)?,
            livery_id: self.get(Field::LiveryId)?,
            manufacturer_id: self.get(Field::ManufacturerId)?,
            slot_id: self.get(Field::SlotId)?,
            class_performance_index: self.get(Field::ClassPerformanceIndex)?,
        })
    }

    pub fn penalties(&self) -> DecodeResult<PenaltyCounts> {
        self.view.locate(Field::Penalties)?;
        read_penalties(&self.view)
    }
}

field_accessors!(DriverRecord {
    name: String => DriverName,
    finish_status: i32 => FinishStatus,
    place: i32 => Place,
    lap_distance: f32 => LapDistance,
    position: Vec3<f32> => WorldPosition,
    track_sector: i32 => TrackSector,
    completed_laps: i32 => CompletedLaps,
    current_lap_valid: i32 => CurrentLapValid,
    lap_time_current_self: f32 => LapTimeCurrentSelf,
    sector_time_current_self: [f32; 3] => SectorTimeCurrentSelf,
    sector_time_previous_self: [f32; 3] => SectorTimePreviousSelf,
    sector_time_best_self: [f32; 3] => SectorTimeBestSelf,
    time_delta_front: f32 => TimeDeltaFront,
    time_delta_behind: f32 => TimeDeltaBehind,
    pit_stop_status: i32 => PitStopStatus,
    in_pitlane: i32 => InPitlane,
    num_pitstops: i32 => NumPitstops,
    car_speed: f32 => CarSpeed,
    /// Single compound for both axles, 1.6 only
    tire_type: i32 => TireType,
    tire_type_front: i32 => TireTypeFront,
    tire_type_rear: i32 => TireTypeRear,
});
