//! Point definitions: register spaces, value kinds and the static
//! definition record the catalog is built from.
//!
//! Registers are identified by their Modicon point number (`40001`,
//! `30057`, ...). The wire offset sent on the bus is always
//! `number - base` of the owning register space, for every function code.

use serde::Serialize;

/// The four Modbus register spaces the S3200 exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterSpace {
    /// 1xxxx, read with FC02.
    DiscreteInput,
    /// Coils, read with FC01.
    Coil,
    /// 3xxxx, read with FC04.
    InputRegister,
    /// 4xxxx, read with FC03 and written with FC06.
    HoldingRegister,
}

impl RegisterSpace {
    /// Modicon base of the space. Wire offset = point number - base.
    pub const fn base(self) -> u32 {
        match self {
            Self::DiscreteInput => 10001,
            Self::Coil => 1,
            Self::InputRegister => 30001,
            Self::HoldingRegister => 40001,
        }
    }

    /// Whether reads in this space return single bits rather than
    /// 16-bit registers.
    pub const fn is_bit(self) -> bool {
        matches!(self, Self::DiscreteInput | Self::Coil)
    }

    /// Only holding registers accept FC06 writes.
    pub const fn accepts_writes(self) -> bool {
        matches!(self, Self::HoldingRegister)
    }
}

/// Raw register value the controller reports for a setpoint it refused
/// to accept ("write ignored").
pub const SENTINEL_RAW: u16 = 0xFFFF;

/// Parameters for scaled fixed-point numbers.
///
/// The register holds `value * scale` as a 16-bit integer; `signed`
/// points use two's complement. `min`/`max` bound values on write only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledParams {
    pub scale: f64,
    pub decimals: u32,
    pub signed: bool,
    /// Treat [`SENTINEL_RAW`] as "value unknown" instead of a number.
    pub sentinel_unknown: bool,
    pub min: f64,
    pub max: f64,
}

impl ScaledParams {
    /// Read-only sensor scaling: signed, no write bounds, no sentinel.
    pub const fn sensor(scale: f64, decimals: u32) -> Self {
        Self {
            scale,
            decimals,
            signed: true,
            sentinel_unknown: false,
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    /// Writable setpoint scaling: unsigned with write bounds and the
    /// write-ignored sentinel.
    pub const fn setpoint(scale: f64, decimals: u32, min: f64, max: f64) -> Self {
        Self {
            scale,
            decimals,
            signed: false,
            sentinel_unknown: true,
            min,
            max,
        }
    }

    /// Setpoint whose bounds reach below zero; encoded as two's complement.
    pub const fn signed_setpoint(scale: f64, decimals: u32, min: f64, max: f64) -> Self {
        Self {
            signed: true,
            ..Self::setpoint(scale, decimals, min, max)
        }
    }
}

/// Parameters for duration registers rendered as a time of day.
///
/// The register counts fixed fractions of an hour (e.g. tenths, so 6-minute
/// steps). Values clamp to `max_units` on both directions and wrap at 24:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParams {
    pub units_per_hour: u16,
    pub max_units: u16,
}

impl DurationParams {
    /// `units_per_hour` must be a divisor of 60 so units map to whole
    /// minutes.
    pub const fn minutes_per_unit(self) -> u16 {
        debug_assert!(self.units_per_hour != 0 && 60 % self.units_per_hour == 0);
        60 / self.units_per_hour
    }
}

/// A static code-to-label table for enumerated registers.
#[derive(Debug)]
pub struct EnumTable {
    pub entries: &'static [(u16, &'static str)],
}

impl EnumTable {
    pub fn label(&self, code: u16) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, l)| *l)
    }

    pub fn code(&self, label: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(c, _)| *c)
    }
}

/// How the raw register/bit maps to a [`PointValue`](crate::core::value::PointValue).
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    /// Bit, or register interpreted as zero/non-zero.
    Bool,
    /// Scaled fixed-point number.
    Scaled(ScaledParams),
    /// Enumerated code with a label table; unrecognised codes decode to
    /// `Unknown (<code>)` and may be written back verbatim.
    Enum(&'static EnumTable),
    /// Time of day, HHMM encoded (1430 = 14:30, 2400 = 00:00).
    TimeOfDay,
    /// Duration in fixed fractions of an hour, rendered as time of day.
    Duration(DurationParams),
}

impl ValueKind {
    /// The value shape this kind expects on write, for error messages.
    pub const fn expected_input(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Scaled(_) => "number",
            Self::Enum(_) => "option label",
            Self::TimeOfDay | Self::Duration(_) => "time of day",
        }
    }
}

/// Subsystem groups, matching the controller's configurable extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Controller,
    Boiler,
    Dhw,
    HeatingCircuit1,
    HeatingCircuit2,
    Buffer,
    Discharge,
    Circulation,
}

impl Group {
    pub const ALL: [Group; 8] = [
        Group::Controller,
        Group::Boiler,
        Group::Dhw,
        Group::HeatingCircuit1,
        Group::HeatingCircuit2,
        Group::Buffer,
        Group::Discharge,
        Group::Circulation,
    ];

    /// Stable config key for the group.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Boiler => "boiler",
            Self::Dhw => "dhw",
            Self::HeatingCircuit1 => "hk1",
            Self::HeatingCircuit2 => "hk2",
            Self::Buffer => "buffer",
            Self::Discharge => "discharge",
            Self::Circulation => "circulation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.key() == key)
    }
}

/// One entry of the static register catalog.
#[derive(Debug)]
pub struct PointDefinition {
    /// Stable point identifier.
    pub id: &'static str,
    pub space: RegisterSpace,
    /// Modicon point number (40001, 31001, 10002, ...).
    pub number: u32,
    pub kind: ValueKind,
    pub writable: bool,
    pub group: Group,
    pub unit: Option<&'static str>,
    /// Advisory minimum interval between writes, in seconds. Writes
    /// inside the interval still go through but are flagged.
    pub min_rewrite_secs: Option<u64>,
}

impl PointDefinition {
    /// Zero-based address sent on the wire.
    pub fn wire_offset(&self) -> u16 {
        (self.number - self.space.base()) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_bases() {
        assert_eq!(RegisterSpace::DiscreteInput.base(), 10001);
        assert_eq!(RegisterSpace::Coil.base(), 1);
        assert_eq!(RegisterSpace::InputRegister.base(), 30001);
        assert_eq!(RegisterSpace::HoldingRegister.base(), 40001);
    }

    #[test]
    fn test_wire_offsets() {
        let def = PointDefinition {
            id: "x",
            space: RegisterSpace::HoldingRegister,
            number: 41044,
            kind: ValueKind::Bool,
            writable: false,
            group: Group::HeatingCircuit1,
            unit: None,
            min_rewrite_secs: None,
        };
        assert_eq!(def.wire_offset(), 1043);
    }

    #[test]
    fn test_duration_minutes_per_unit() {
        let tenths = DurationParams {
            units_per_hour: 10,
            max_units: 240,
        };
        assert_eq!(tenths.minutes_per_unit(), 6);

        let quarters = DurationParams {
            units_per_hour: 4,
            max_units: 96,
        };
        assert_eq!(quarters.minutes_per_unit(), 15);
    }

    #[test]
    #[should_panic]
    fn test_duration_units_must_divide_the_hour() {
        let bad = DurationParams {
            units_per_hour: 7,
            max_units: 100,
        };
        let _ = bad.minutes_per_unit();
    }

    #[test]
    fn test_group_keys_round_trip() {
        for group in Group::ALL {
            assert_eq!(Group::from_key(group.key()), Some(group));
        }
        assert_eq!(Group::from_key("bogus"), None);
    }

    #[test]
    fn test_enum_table_lookup() {
        static TABLE: EnumTable = EnumTable {
            entries: &[(0, "off"), (1, "auto")],
        };
        assert_eq!(TABLE.label(1), Some("auto"));
        assert_eq!(TABLE.label(9), None);
        assert_eq!(TABLE.code("off"), Some(0));
        assert_eq!(TABLE.code("party"), None);
    }
}
