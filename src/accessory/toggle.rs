// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Momentary toggle switches.
//!
//! Some bridges expose a stateless push button next to the fan and light
//! switches. A press arrives as a `set(true)`; how that maps onto the
//! stateful power data point is a [`TogglePolicy`].

/// Resolves a toggle press against the current power state.
///
/// # Examples
///
/// ```
/// use fanlink::accessory::TogglePolicy;
///
/// let policy = TogglePolicy::Debounce;
/// assert!(policy.resolve(false, true));
/// assert!(!policy.resolve(true, true));
/// assert!(!policy.resolve(true, false));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum TogglePolicy {
    /// A press turns the device on if it is off and off if it is on; an
    /// explicit off always turns it off.
    #[default]
    Debounce,
    /// Every set flips the power, regardless of the requested value.
    Flip,
    /// The requested value is written as is.
    PassThrough,
}

impl TogglePolicy {
    /// Returns the new power state for a toggle set.
    #[must_use]
    pub const fn resolve(&self, current: bool, requested: bool) -> bool {
        match self {
            Self::Debounce => {
                if current && requested {
                    false
                } else {
                    requested
                }
            }
            Self::Flip => !current,
            Self::PassThrough => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_truth_table() {
        let policy = TogglePolicy::Debounce;
        assert!(policy.resolve(false, true));
        assert!(!policy.resolve(true, true));
        assert!(!policy.resolve(true, false));
        assert!(!policy.resolve(false, false));
    }

    #[test]
    fn flip_ignores_request() {
        let policy = TogglePolicy::Flip;
        assert!(policy.resolve(false, false));
        assert!(!policy.resolve(true, true));
    }

    #[test]
    fn pass_through() {
        let policy = TogglePolicy::PassThrough;
        assert!(policy.resolve(true, true));
        assert!(!policy.resolve(false, false));
    }

    #[test]
    fn serde_names() {
        let policy: TogglePolicy = serde_json::from_str("\"passThrough\"").unwrap();
        assert_eq!(policy, TogglePolicy::PassThrough);
        assert_eq!(serde_json::to_string(&TogglePolicy::Flip).unwrap(), "\"flip\"");
    }
}
