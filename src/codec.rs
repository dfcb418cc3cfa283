// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between state changes and data point entries.
//!
//! [`decode`] turns one reported `(DpId, DpValue)` pair into a
//! [`StateChange`]; [`encode`] turns one state change into the
//! [`DpWrite`] the device expects. Both are pure: the only context decode
//! needs is the current fan speed, because the device reports a 6-step
//! speed and the bridge dial keeps its finer position when it still falls
//! inside the reported step.

use crate::error::{DecodeError, ValueError};
use crate::protocol::{DpId, DpValue, DpWrite};
use crate::state::{FanState, StateChange};
use crate::types::{BandPolicy, ColorTemperature, RotationDirection, SpeedStep, WireBrightness};

/// Decodes one reported data point.
///
/// Returns `Ok(None)` for data points this library does not interpret.
///
/// # Errors
///
/// Returns [`DecodeError`] if the raw value has the wrong type or is out of
/// range for its data point.
///
/// # Examples
///
/// ```
/// use fanlink::codec::decode;
/// use fanlink::protocol::{DpId, DpValue};
/// use fanlink::state::{FanState, StateChange};
/// use fanlink::types::{BandPolicy, Percent};
///
/// let mut state = FanState::new();
/// state.apply(&StateChange::FanSpeed(Percent::new(70).unwrap()));
///
/// // Step 5 covers 65..=80, so the dial stays at 70.
/// let change = decode(DpId::FAN_SPEED, &DpValue::Integer(5), &state, BandPolicy::default())
///     .unwrap()
///     .unwrap();
/// assert_eq!(change, StateChange::FanSpeed(Percent::new(70).unwrap()));
/// ```
pub fn decode(
    dp: DpId,
    value: &DpValue,
    current: &FanState,
    band_policy: BandPolicy,
) -> Result<Option<StateChange>, DecodeError> {
    let change = match dp {
        DpId::FAN_POWER => StateChange::FanPower(value.as_bool(dp)?),
        DpId::FAN_SPEED => {
            let raw = value.as_integer(dp)?;
            let step = u8::try_from(raw)
                .map_err(|_| out_of_range(i64::from(SpeedStep::MIN), i64::from(SpeedStep::MAX), raw))
                .and_then(SpeedStep::new)
                .map_err(|source| DecodeError::OutOfRange { dp, source })?;
            StateChange::FanSpeed(step.to_percent_with(current.fan_speed(), band_policy))
        }
        DpId::FAN_ROTATION => {
            let direction = value
                .as_str(dp)?
                .parse::<RotationDirection>()
                .map_err(|source| DecodeError::OutOfRange { dp, source })?;
            StateChange::FanRotation(direction)
        }
        DpId::LIGHT_POWER => StateChange::LightPower(value.as_bool(dp)?),
        DpId::LIGHT_BRIGHTNESS => {
            let raw = value.as_integer(dp)?;
            let brightness = u16::try_from(raw)
                .map_err(|_| out_of_range(0, i64::from(WireBrightness::MAX), raw))
                .and_then(WireBrightness::new)
                .map_err(|source| DecodeError::OutOfRange { dp, source })?;
            StateChange::LightBrightness(brightness.to_percent())
        }
        DpId::LIGHT_COLOR_TEMPERATURE => {
            let raw = value.as_integer(dp)?;
            let device = u16::try_from(raw).map_err(|_| DecodeError::OutOfRange {
                dp,
                source: out_of_range(0, i64::from(u16::MAX), raw),
            })?;
            StateChange::LightColorTemperature(ColorTemperature::from_device(device))
        }
        _ => return Ok(None),
    };
    Ok(Some(change))
}

/// Encodes a state change as the data point write that produces it.
///
/// # Examples
///
/// ```
/// use fanlink::codec::encode;
/// use fanlink::protocol::{DpId, DpValue};
/// use fanlink::state::StateChange;
/// use fanlink::types::Percent;
///
/// let write = encode(&StateChange::FanSpeed(Percent::new(70).unwrap()));
/// assert_eq!(write.dp, DpId::FAN_SPEED);
/// assert_eq!(write.value, DpValue::Integer(5));
/// ```
#[must_use]
pub fn encode(change: &StateChange) -> DpWrite {
    match *change {
        StateChange::FanPower(on) => DpWrite::new(DpId::FAN_POWER, on),
        StateChange::FanRotation(direction) => {
            DpWrite::new(DpId::FAN_ROTATION, direction.as_wire())
        }
        StateChange::FanSpeed(percent) => DpWrite::new(
            DpId::FAN_SPEED,
            i64::from(SpeedStep::from_percent(percent).value()),
        ),
        StateChange::LightPower(on) => DpWrite::new(DpId::LIGHT_POWER, on),
        StateChange::LightBrightness(percent) => DpWrite::new(
            DpId::LIGHT_BRIGHTNESS,
            i64::from(WireBrightness::from_percent(percent).value()),
        ),
        StateChange::LightColorTemperature(ct) => {
            DpWrite::new(DpId::LIGHT_COLOR_TEMPERATURE, i64::from(ct.to_device()))
        }
    }
}

fn out_of_range(min: i64, max: i64, actual: i64) -> ValueError {
    ValueError::OutOfRange { min, max, actual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Percent;

    fn decode_default(dp: DpId, value: DpValue) -> Result<Option<StateChange>, DecodeError> {
        decode(dp, &value, &FanState::new(), BandPolicy::default())
    }

    #[test]
    fn decode_fan_power() {
        assert_eq!(
            decode_default(DpId::FAN_POWER, DpValue::Bool(true)).unwrap(),
            Some(StateChange::FanPower(true))
        );
    }

    #[test]
    fn decode_fan_speed_uses_current_dial() {
        // Default dial is 20, which lies inside step 2 (15..=30).
        assert_eq!(
            decode_default(DpId::FAN_SPEED, DpValue::Integer(2)).unwrap(),
            Some(StateChange::FanSpeed(Percent::clamped(20)))
        );
        assert_eq!(
            decode_default(DpId::FAN_SPEED, DpValue::Integer(4)).unwrap(),
            Some(StateChange::FanSpeed(Percent::clamped(50)))
        );
    }

    #[test]
    fn decode_fan_speed_rejects_bad_step() {
        let err = decode_default(DpId::FAN_SPEED, DpValue::Integer(7)).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { dp, .. } if dp == DpId::FAN_SPEED));

        let err = decode_default(DpId::FAN_SPEED, DpValue::Integer(-1)).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));
    }

    #[test]
    fn decode_rotation() {
        assert_eq!(
            decode_default(DpId::FAN_ROTATION, DpValue::from("reverse")).unwrap(),
            Some(StateChange::FanRotation(RotationDirection::Reverse))
        );
        assert!(decode_default(DpId::FAN_ROTATION, DpValue::from("sideways")).is_err());
    }

    #[test]
    fn decode_brightness() {
        assert_eq!(
            decode_default(DpId::LIGHT_BRIGHTNESS, DpValue::Integer(450)).unwrap(),
            Some(StateChange::LightBrightness(Percent::clamped(45)))
        );
        assert!(decode_default(DpId::LIGHT_BRIGHTNESS, DpValue::Integer(1001)).is_err());
    }

    #[test]
    fn decode_color_temperature() {
        assert_eq!(
            decode_default(DpId::LIGHT_COLOR_TEMPERATURE, DpValue::Integer(1000)).unwrap(),
            Some(StateChange::LightColorTemperature(ColorTemperature::WARM))
        );
        assert_eq!(
            decode_default(DpId::LIGHT_COLOR_TEMPERATURE, DpValue::Integer(42)).unwrap(),
            Some(StateChange::LightColorTemperature(ColorTemperature::COLD))
        );
    }

    #[test]
    fn decode_wrong_type() {
        let err = decode_default(DpId::FAN_POWER, DpValue::Integer(1)).unwrap_err();
        assert!(matches!(err, DecodeError::WrongType { expected: "bool", .. }));
    }

    #[test]
    fn decode_unknown_dp_is_ignored() {
        assert_eq!(
            decode_default(DpId::new(101), DpValue::Bool(true)).unwrap(),
            None
        );
    }

    #[test]
    fn encode_each_field() {
        assert_eq!(
            encode(&StateChange::FanPower(false)),
            DpWrite::new(DpId::FAN_POWER, false)
        );
        assert_eq!(
            encode(&StateChange::FanRotation(RotationDirection::Forward)),
            DpWrite::new(DpId::FAN_ROTATION, "forward")
        );
        assert_eq!(
            encode(&StateChange::LightBrightness(Percent::clamped(45))),
            DpWrite::new(DpId::LIGHT_BRIGHTNESS, 450_i64)
        );
        assert_eq!(
            encode(&StateChange::LightColorTemperature(ColorTemperature::NEUTRAL)),
            DpWrite::new(DpId::LIGHT_COLOR_TEMPERATURE, 500_i64)
        );
    }
}
