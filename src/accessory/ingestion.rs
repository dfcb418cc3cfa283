// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event ingestion: device reports to state changes and notifications.

use crate::capability::{Capability, CapabilitySet, CapabilityUpdate};
use crate::codec;
use crate::protocol::{DpId, DpMap};
use crate::state::{FanState, StateChange};
use crate::types::BandPolicy;

/// Effects of one device report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingest {
    /// Store updates, in data point order.
    pub changes: Vec<StateChange>,
    /// Bridge notifications. Sent even when the value did not change.
    pub notifications: Vec<CapabilityUpdate>,
}

/// Decodes a (possibly partial) report.
///
/// Data points for components the accessory does not expose are ignored,
/// as are data points the library does not know. A malformed value is
/// logged and skipped; the remaining data points still apply.
///
/// # Examples
///
/// ```
/// use fanlink::accessory::ingest;
/// use fanlink::protocol::{DpId, DpMap};
/// use fanlink::state::{FanState, StateChange};
/// use fanlink::types::BandPolicy;
/// use fanlink::CapabilitySet;
///
/// let capabilities = CapabilitySet::from_flags(false, false, false);
/// let dps = DpMap::new().with(DpId::FAN_POWER, true);
///
/// let report = ingest("bf01", &capabilities, BandPolicy::default(), &FanState::new(), &dps);
/// assert_eq!(report.changes, vec![StateChange::FanPower(true)]);
/// ```
#[must_use]
pub fn ingest(
    device_id: &str,
    capabilities: &CapabilitySet,
    band_policy: BandPolicy,
    state: &FanState,
    dps: &DpMap,
) -> Ingest {
    let mut report = Ingest::default();

    for (dp, value) in dps.iter() {
        if !is_exposed(capabilities, dp) {
            tracing::trace!(%device_id, %dp, "Ignoring data point");
            continue;
        }

        let change = match codec::decode(dp, value, state, band_policy) {
            Ok(Some(change)) => change,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(%device_id, error = %e, "Skipping malformed data point");
                continue;
            }
        };

        tracing::debug!(%device_id, capability = %change.capability(), value = %change.value(), "Device reported");
        report.changes.push(change);
        report
            .notifications
            .push(CapabilityUpdate::new(change.capability(), change.value()));

        if change.is_power()
            && let Some(toggle) = change.capability().paired_switch()
            && capabilities.contains(toggle)
        {
            report
                .notifications
                .push(CapabilityUpdate::new(toggle, change.value()));
        }
    }

    report
}

fn is_exposed(capabilities: &CapabilitySet, dp: DpId) -> bool {
    match dp {
        DpId::FAN_POWER | DpId::FAN_SPEED | DpId::FAN_ROTATION => true,
        DpId::LIGHT_POWER | DpId::LIGHT_BRIGHTNESS => capabilities.has_light(),
        DpId::LIGHT_COLOR_TEMPERATURE => capabilities.contains(Capability::LightColorTemperature),
        _ => false,
    }
}
