//! Pure value codec for S3200 registers.
//!
//! Everything in this module is a total function over raw bus values: a
//! register read never aborts a poll because of its content. The quirks
//! handled here come straight from the controller's register map:
//!
//! - scaled fixed-point numbers, optionally signed 16-bit two's complement
//! - the `65535` "write ignored" sentinel on settable numbers
//! - enumerated state codes with `Unknown (<code>)` pass-through
//! - HHMM-encoded times of day (`1430` = 14:30, `2400` = 00:00)
//! - durations counted in fixed fractions of an hour, shown as HH:MM

use thiserror::Error;

use crate::core::point::{
    DurationParams, EnumTable, ScaledParams, ValueKind, SENTINEL_RAW,
};
use crate::core::value::PointValue;

/// Raw value read from the bus, before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    /// FC01/FC02 result.
    Bit(bool),
    /// FC03/FC04 result.
    Register(u16),
}

/// Decode result: a value, or "the controller reports this as unknown".
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Value(PointValue),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A register-valued kind received a single bit. Points in bit spaces
    /// must use the boolean kind.
    #[error("expected a register value, got a bit")]
    ExpectedRegister,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("expected a {expected} value")]
    TypeMismatch { expected: &'static str },

    #[error("unrecognised option: {0}")]
    UnknownOption(String),
}

/// A value encoded for an FC06 write.
///
/// `applied` is the value the register will actually hold after clamping
/// and quantization; callers cache it instead of the requested value.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub raw: u16,
    pub applied: PointValue,
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Decode a scaled fixed-point register. `None` means the controller
/// reports the value as unknown (sentinel).
pub fn decode_scaled(params: &ScaledParams, raw: u16) -> Option<f64> {
    if params.sentinel_unknown && raw == SENTINEL_RAW {
        return None;
    }
    let magnitude = if params.signed {
        raw as i16 as f64
    } else {
        raw as f64
    };
    Some(round_to(magnitude / params.scale, params.decimals))
}

/// Encode a number for a scaled register: clamp to the write bounds,
/// quantize to the register resolution, and report the value the
/// register will hold.
pub fn encode_scaled(params: &ScaledParams, value: f64) -> (u16, f64) {
    let clamped = value.clamp(params.min, params.max);
    let scaled = (clamped * params.scale).round() as i64;
    let raw = if scaled < 0 {
        scaled as i16 as u16
    } else {
        scaled as u16
    };
    let magnitude = if params.signed {
        raw as i16 as f64
    } else {
        raw as f64
    };
    (raw, round_to(magnitude / params.scale, params.decimals))
}

/// Decode an enum code. Total: unrecognised codes become `Unknown (<code>)`.
pub fn decode_enum(table: &EnumTable, raw: u16) -> String {
    match table.label(raw) {
        Some(label) => label.to_string(),
        None => format!("Unknown ({raw})"),
    }
}

/// Encode an enum label, accepting the `Unknown (<code>)` fallback form
/// back verbatim.
pub fn decode_enum_label(table: &EnumTable, label: &str) -> Option<u16> {
    if let Some(code) = table.code(label) {
        return Some(code);
    }
    label
        .strip_prefix("Unknown (")?
        .strip_suffix(')')?
        .parse()
        .ok()
}

/// Decode an HHMM register. `2400` means midnight; out-of-range digits
/// clamp to a valid time.
pub fn decode_hhmm(raw: u16) -> (u8, u8) {
    if raw == 2400 {
        return (0, 0);
    }
    let hour = (raw / 100).min(23) as u8;
    let minute = (raw % 100).min(59) as u8;
    (hour, minute)
}

/// Encode a time of day as HHMM.
pub fn encode_hhmm(hour: u8, minute: u8) -> u16 {
    u16::from(hour.min(23)) * 100 + u16::from(minute.min(59))
}

/// Decode a duration register into hours and minutes, wrapping 24:00 to
/// 00:00.
pub fn decode_duration(params: &DurationParams, raw: u16) -> (u8, u8) {
    let units = raw.min(params.max_units);
    let minutes = u32::from(units) * u32::from(params.minutes_per_unit()) % 1440;
    ((minutes / 60) as u8, (minutes % 60) as u8)
}

/// Encode a duration: snap to the register granularity, clamp to the
/// register's maximum, and return both the raw value and the snapped
/// duration as hours and minutes.
pub fn encode_duration(params: &DurationParams, hour: u8, minute: u8) -> (u16, (u8, u8)) {
    let minutes = u32::from(hour) * 60 + u32::from(minute);
    let per_unit = u32::from(params.minutes_per_unit());
    let raw = ((minutes as f64 / per_unit as f64).round() as u16).min(params.max_units);
    (raw, decode_duration(params, raw))
}

/// Decode a raw bus value according to the point's value kind.
pub fn decode_value(kind: &ValueKind, raw: RawValue) -> Result<Decoded, DecodeError> {
    match (kind, raw) {
        (ValueKind::Bool, RawValue::Bit(bit)) => Ok(Decoded::Value(PointValue::Bool(bit))),
        (ValueKind::Bool, RawValue::Register(reg)) => {
            Ok(Decoded::Value(PointValue::Bool(reg != 0)))
        }
        (_, RawValue::Bit(_)) => Err(DecodeError::ExpectedRegister),
        (ValueKind::Scaled(params), RawValue::Register(reg)) => {
            Ok(match decode_scaled(params, reg) {
                Some(v) => Decoded::Value(PointValue::Number(v)),
                None => Decoded::Unknown,
            })
        }
        (ValueKind::Enum(table), RawValue::Register(reg)) => {
            Ok(Decoded::Value(PointValue::Text(decode_enum(table, reg))))
        }
        (ValueKind::TimeOfDay, RawValue::Register(reg)) => {
            let (hour, minute) = decode_hhmm(reg);
            Ok(Decoded::Value(PointValue::time(hour, minute)))
        }
        (ValueKind::Duration(params), RawValue::Register(reg)) => {
            let (hour, minute) = decode_duration(params, reg);
            Ok(Decoded::Value(PointValue::time(hour, minute)))
        }
    }
}

/// Encode a point value for an FC06 write according to the point's value
/// kind. Numeric kinds cannot fail; only shape mismatches and unparseable
/// enum labels are errors.
pub fn encode_value(kind: &ValueKind, value: &PointValue) -> Result<Encoded, EncodeError> {
    match (kind, value) {
        (ValueKind::Bool, PointValue::Bool(on)) => Ok(Encoded {
            raw: u16::from(*on),
            applied: value.clone(),
        }),
        (ValueKind::Scaled(params), PointValue::Number(v)) => {
            let (raw, applied) = encode_scaled(params, *v);
            Ok(Encoded {
                raw,
                applied: PointValue::Number(applied),
            })
        }
        (ValueKind::Enum(table), PointValue::Text(label)) => decode_enum_label(table, label)
            .map(|raw| Encoded {
                raw,
                applied: value.clone(),
            })
            .ok_or_else(|| EncodeError::UnknownOption(label.clone())),
        (ValueKind::TimeOfDay, PointValue::Time { hour, minute }) => {
            let (hour, minute) = (hour.min(&23), minute.min(&59));
            Ok(Encoded {
                raw: encode_hhmm(*hour, *minute),
                applied: PointValue::time(*hour, *minute),
            })
        }
        (ValueKind::Duration(params), PointValue::Time { hour, minute }) => {
            let (raw, (hour, minute)) = encode_duration(params, *hour, *minute);
            Ok(Encoded {
                raw,
                applied: PointValue::time(hour, minute),
            })
        }
        (kind, _) => Err(EncodeError::TypeMismatch {
            expected: kind.expected_input(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENTHS_OF_HOURS: DurationParams = DurationParams {
        units_per_hour: 10,
        max_units: 240,
    };

    static MODE_TABLE: EnumTable = EnumTable {
        entries: &[(0, "off"), (1, "auto"), (2, "extra")],
    };

    #[test]
    fn test_scaled_decode_halves() {
        let params = ScaledParams::sensor(2.0, 1);
        assert_eq!(decode_scaled(&params, 143), Some(71.5));
        assert_eq!(decode_scaled(&params, 0), Some(0.0));
    }

    #[test]
    fn test_scaled_sign_extension() {
        // -7 degrees at scale 2 is stored as 65522.
        let params = ScaledParams::sensor(2.0, 1);
        assert_eq!(decode_scaled(&params, 65522), Some(-7.0));
        // Unsigned points read the same raw as a large positive number.
        let params = ScaledParams::setpoint(2.0, 1, 0.0, f64::MAX);
        assert_eq!(decode_scaled(&params, 65522), Some(32761.0));
    }

    #[test]
    fn test_scaled_sentinel() {
        let params = ScaledParams::signed_setpoint(2.0, 1, -20.0, 50.0);
        assert_eq!(decode_scaled(&params, SENTINEL_RAW), None);
        // Without the sentinel flag 0xFFFF is just -0.5.
        let params = ScaledParams::sensor(2.0, 1);
        assert_eq!(decode_scaled(&params, SENTINEL_RAW), Some(-0.5));
    }

    #[test]
    fn test_scaled_encode_clamps() {
        let params = ScaledParams::setpoint(2.0, 0, 70.0, 90.0);
        assert_eq!(encode_scaled(&params, 95.0), (180, 90.0));
        assert_eq!(encode_scaled(&params, 12.0), (140, 70.0));
        assert_eq!(encode_scaled(&params, 85.0), (170, 85.0));
    }

    #[test]
    fn test_scaled_encode_negative_two_complement() {
        let params = ScaledParams::signed_setpoint(2.0, 1, -20.0, 50.0);
        let (raw, applied) = encode_scaled(&params, -7.0);
        assert_eq!(raw, 65522);
        assert_eq!(applied, -7.0);
    }

    #[test]
    fn test_scaled_round_trip_within_quantization() {
        // decode -> encode must reproduce the raw register exactly when the
        // decimals keep the full register resolution.
        let params = ScaledParams {
            scale: 2.0,
            decimals: 1,
            signed: true,
            sentinel_unknown: false,
            min: f64::MIN,
            max: f64::MAX,
        };
        for raw in [0u16, 1, 3, 140, 180, 32767, 32768, 65522, 65535] {
            let value = decode_scaled(&params, raw).unwrap();
            let (encoded, applied) = encode_scaled(&params, value);
            assert_eq!(encoded, raw, "raw {raw} decoded to {value}");
            assert_eq!(applied, value);
        }
    }

    #[test]
    fn test_enum_decode_never_fails() {
        assert_eq!(decode_enum(&MODE_TABLE, 1), "auto");
        assert_eq!(decode_enum(&MODE_TABLE, 42), "Unknown (42)");
    }

    #[test]
    fn test_enum_label_pass_through() {
        assert_eq!(decode_enum_label(&MODE_TABLE, "extra"), Some(2));
        assert_eq!(decode_enum_label(&MODE_TABLE, "Unknown (42)"), Some(42));
        assert_eq!(decode_enum_label(&MODE_TABLE, "Unknown (x)"), None);
        assert_eq!(decode_enum_label(&MODE_TABLE, "party mode"), None);
    }

    #[test]
    fn test_hhmm_decode() {
        assert_eq!(decode_hhmm(1430), (14, 30));
        assert_eq!(decode_hhmm(2400), (0, 0));
        assert_eq!(decode_hhmm(0), (0, 0));
        // Out-of-range digits clamp instead of failing.
        assert_eq!(decode_hhmm(2575), (23, 59));
    }

    #[test]
    fn test_hhmm_encode() {
        assert_eq!(encode_hhmm(14, 30), 1430);
        assert_eq!(encode_hhmm(0, 0), 0);
        assert_eq!(encode_hhmm(25, 75), 2359);
    }

    #[test]
    fn test_duration_decode_wraps_at_midnight() {
        // 240 tenths = 24.0 h, shown as 00:00.
        assert_eq!(decode_duration(&TENTHS_OF_HOURS, 240), (0, 0));
        assert_eq!(decode_duration(&TENTHS_OF_HOURS, 15), (1, 30));
        // Values above the maximum clamp first.
        assert_eq!(decode_duration(&TENTHS_OF_HOURS, 500), (0, 0));
    }

    #[test]
    fn test_duration_encode_snaps() {
        // 6 minutes is exactly one tenth of an hour.
        assert_eq!(encode_duration(&TENTHS_OF_HOURS, 0, 6), (1, (0, 6)));
        // 8 minutes snaps to the nearest unit.
        assert_eq!(encode_duration(&TENTHS_OF_HOURS, 0, 8), (1, (0, 6)));
        assert_eq!(encode_duration(&TENTHS_OF_HOURS, 1, 30), (15, (1, 30)));
    }

    #[test]
    fn test_decode_value_bit_shapes() {
        assert_eq!(
            decode_value(&ValueKind::Bool, RawValue::Bit(true)),
            Ok(Decoded::Value(PointValue::Bool(true)))
        );
        assert_eq!(
            decode_value(&ValueKind::Bool, RawValue::Register(7)),
            Ok(Decoded::Value(PointValue::Bool(true)))
        );
        assert_eq!(
            decode_value(&ValueKind::TimeOfDay, RawValue::Bit(true)),
            Err(DecodeError::ExpectedRegister)
        );
    }

    #[test]
    fn test_encode_value_type_mismatch() {
        let err = encode_value(&ValueKind::Bool, &PointValue::Number(1.0)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::TypeMismatch {
                expected: "boolean"
            }
        );
    }

    #[test]
    fn test_encode_value_unknown_option() {
        let err = encode_value(
            &ValueKind::Enum(&MODE_TABLE),
            &PointValue::Text("warp".into()),
        )
        .unwrap_err();
        assert_eq!(err, EncodeError::UnknownOption("warp".into()));
    }
}
