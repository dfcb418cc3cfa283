// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatcher: bridge `set` intents to state changes and writes.
//!
//! [`dispatch`] is pure. It decides what a `set` does (which fields of the
//! store change, which data points are written, which other capabilities
//! must be told about the new value) and leaves applying it to the
//! accessory task.

use crate::capability::{Capability, CapabilitySet, CapabilityUpdate, CapabilityValue};
use crate::codec;
use crate::error::{Error, ValueError};
use crate::protocol::DpWrite;
use crate::state::{FanState, StateChange};
use crate::types::{ColorTemperature, Percent, RotationDirection};

use super::TogglePolicy;

/// Effects of one `set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Optimistic updates to the store, applied before any write.
    pub changes: Vec<StateChange>,
    /// Data point writes, in send order.
    pub writes: Vec<DpWrite>,
    /// Capabilities whose bridge-side value must be refreshed.
    pub notifications: Vec<CapabilityUpdate>,
}

impl Dispatch {
    fn single(change: StateChange) -> Self {
        Self {
            changes: vec![change],
            writes: vec![codec::encode(&change)],
            notifications: Vec::new(),
        }
    }
}

/// Plans a `set` of `capability` to `value`.
///
/// Rules:
/// - a fan speed of 0 turns the fan off and keeps the stored speed
/// - a brightness of 0 turns the light off and keeps the stored brightness
/// - toggle switches resolve the press through `toggle_policy` and write the
///   power data point
/// - every other declared capability that displays the same power is
///   notified; a toggle is notified too since its resolved value may differ
///   from the request
///
/// # Errors
///
/// Returns `Error::CapabilityNotSupported` for undeclared capabilities and
/// `Error::Value` when the value kind does not match the capability.
///
/// # Examples
///
/// ```
/// use fanlink::accessory::{dispatch, TogglePolicy};
/// use fanlink::protocol::{DpId, DpValue};
/// use fanlink::state::FanState;
/// use fanlink::types::Percent;
/// use fanlink::{Capability, CapabilitySet, CapabilityValue};
///
/// let capabilities = CapabilitySet::from_flags(false, false, false);
/// let plan = dispatch(
///     &capabilities,
///     TogglePolicy::default(),
///     &FanState::new(),
///     Capability::FanSpeed,
///     CapabilityValue::Percent(Percent::new(70).unwrap()),
/// )
/// .unwrap();
///
/// assert_eq!(plan.writes[0].dp, DpId::FAN_SPEED);
/// assert_eq!(plan.writes[0].value, DpValue::Integer(5));
/// ```
pub fn dispatch(
    capabilities: &CapabilitySet,
    toggle_policy: TogglePolicy,
    state: &FanState,
    capability: Capability,
    value: CapabilityValue,
) -> Result<Dispatch, Error> {
    if !capabilities.contains(capability) {
        return Err(Error::CapabilityNotSupported(capability));
    }

    let plan = match capability {
        Capability::FanPower => {
            power(capabilities, capability, StateChange::FanPower(expect_bool(capability, value)?))
        }
        Capability::FanToggle => {
            let on = toggle_policy.resolve(state.fan_power(), expect_bool(capability, value)?);
            power(capabilities, capability, StateChange::FanPower(on))
        }
        Capability::FanRotation => {
            Dispatch::single(StateChange::FanRotation(expect_rotation(capability, value)?))
        }
        Capability::FanSpeed => {
            let speed = expect_percent(capability, value)?;
            if speed.is_zero() {
                power(capabilities, capability, StateChange::FanPower(false))
            } else {
                Dispatch::single(StateChange::FanSpeed(speed))
            }
        }
        Capability::LightPower => power(
            capabilities,
            capability,
            StateChange::LightPower(expect_bool(capability, value)?),
        ),
        Capability::LightToggle => {
            let on = toggle_policy.resolve(state.light_power(), expect_bool(capability, value)?);
            power(capabilities, capability, StateChange::LightPower(on))
        }
        Capability::LightBrightness => {
            let brightness = expect_percent(capability, value)?;
            if brightness.is_zero() {
                power(capabilities, capability, StateChange::LightPower(false))
            } else {
                Dispatch::single(StateChange::LightBrightness(brightness))
            }
        }
        Capability::LightColorTemperature => Dispatch::single(StateChange::LightColorTemperature(
            expect_color_temperature(capability, value)?,
        )),
    };

    Ok(plan)
}

/// A power change requested through `requested_via`.
fn power(capabilities: &CapabilitySet, requested_via: Capability, change: StateChange) -> Dispatch {
    let mut plan = Dispatch::single(change);
    let primary = change.capability();
    let value = change.value();

    for capability in [Some(primary), primary.paired_switch()].into_iter().flatten() {
        let echoes_request = capability == requested_via && !capability.is_toggle();
        if capabilities.contains(capability) && !echoes_request {
            plan.notifications.push(CapabilityUpdate::new(capability, value));
        }
    }
    plan
}

fn expect_bool(capability: Capability, value: CapabilityValue) -> Result<bool, ValueError> {
    value.as_bool().ok_or(ValueError::WrongKind {
        capability,
        expected: "bool",
    })
}

fn expect_percent(capability: Capability, value: CapabilityValue) -> Result<Percent, ValueError> {
    value.as_percent().ok_or(ValueError::WrongKind {
        capability,
        expected: "percent",
    })
}

fn expect_rotation(
    capability: Capability,
    value: CapabilityValue,
) -> Result<RotationDirection, ValueError> {
    match value {
        CapabilityValue::Rotation(direction) => Ok(direction),
        _ => Err(ValueError::WrongKind {
            capability,
            expected: "rotation direction",
        }),
    }
}

fn expect_color_temperature(
    capability: Capability,
    value: CapabilityValue,
) -> Result<ColorTemperature, ValueError> {
    match value {
        CapabilityValue::ColorTemperature(ct) => Ok(ct),
        _ => Err(ValueError::WrongKind {
            capability,
            expected: "color temperature",
        }),
    }
}
