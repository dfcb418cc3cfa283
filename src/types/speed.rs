// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discrete fan speed steps and their mapping to the percentage dial.
//!
//! The motor supports six speeds while the bridge exposes a 0-100 dial. The
//! forward mapping splits the dial into six equal bands. The reverse mapping
//! cannot be a function of the step alone: when the device echoes back the
//! step it was just sent, the percentage the user picked must survive so the
//! dial does not jump. See [`SpeedStep::to_percent`] and [`BandPolicy`].

use std::fmt;

use crate::error::ValueError;

use super::Percent;

/// Band breakpoints for the reverse mapping. Step `s` covers
/// `BREAKPOINTS[s - 1]..=BREAKPOINTS[s]`.
const BREAKPOINTS: [u8; 7] = [0, 15, 30, 50, 65, 80, 100];

/// Width of one forward band (100 / 6, rounded as the device firmware does).
const BAND_WIDTH: f64 = 16.67;

/// Percentage reported for step 1 when the previous value is outside its band.
const LOWEST_STEP_PERCENT: u8 = 10;

/// How the two extreme steps are mapped back onto the dial.
///
/// Interior steps (2-5) always keep a previous percentage that lies inside
/// their band. The extremes differ between firmware generations of the
/// reference controller, so the choice is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BandPolicy {
    /// Step 1 always reports 10% and step 6 always reports 100%.
    #[default]
    PinExtremes,
    /// Every step keeps an in-band previous value, extremes included.
    KeepInBand,
}

/// Fan motor speed step (1-6).
///
/// # Examples
///
/// ```
/// use fanlink::types::{Percent, SpeedStep};
///
/// let step = SpeedStep::from_percent(Percent::new(70).unwrap());
/// assert_eq!(step.value(), 5);
///
/// // An echo of the same step keeps the user's percentage.
/// assert_eq!(step.to_percent(Percent::new(70).unwrap()).value(), 70);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedStep(u8);

impl SpeedStep {
    /// Slowest step.
    pub const MIN: u8 = 1;

    /// Fastest step.
    pub const MAX: u8 = 6;

    /// Creates a new speed step.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 6].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN),
                max: i64::from(Self::MAX),
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw step.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Quantizes a dial percentage to a motor step.
    ///
    /// Computes `floor(percent / 16.67) + 1`, clamped to 1..=6, so 0% maps to
    /// step 1 and 100% to step 6.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percent(percent: Percent) -> Self {
        // Safe: the quotient is in [0, 6] for any percentage
        let band = (f64::from(percent.value()) / BAND_WIDTH).floor() as u8;
        Self((band + 1).clamp(Self::MIN, Self::MAX))
    }

    /// Returns the inclusive percentage band `(min, max)` for this step.
    #[must_use]
    pub const fn band(&self) -> (u8, u8) {
        let index = self.0 as usize;
        (BREAKPOINTS[index - 1], BREAKPOINTS[index])
    }

    /// Maps a device-reported step back onto the dial using
    /// [`BandPolicy::PinExtremes`].
    #[must_use]
    pub fn to_percent(&self, previous: Percent) -> Percent {
        self.to_percent_with(previous, BandPolicy::default())
    }

    /// Maps a device-reported step back onto the dial.
    ///
    /// `previous` is returned unchanged when it lies inside the step's band
    /// (for steps 1 and 6 only under [`BandPolicy::KeepInBand`]). Otherwise
    /// step 1 maps to 10%, step 6 to 100%, and the other steps to their band
    /// minimum.
    #[must_use]
    pub fn to_percent_with(&self, previous: Percent, policy: BandPolicy) -> Percent {
        let (min, max) = self.band();
        let is_extreme = self.0 == Self::MIN || self.0 == Self::MAX;
        let keeps_previous = !is_extreme || policy == BandPolicy::KeepInBand;
        if keeps_previous && (min..=max).contains(&previous.value()) {
            return previous;
        }
        match self.0 {
            Self::MIN => Percent::clamped(LOWEST_STEP_PERCENT),
            Self::MAX => Percent::MAX,
            _ => Percent::clamped(min),
        }
    }
}

impl fmt::Display for SpeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for SpeedStep {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpeedStep> for u8 {
    fn from(value: SpeedStep) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(v: u8) -> Percent {
        Percent::new(v).unwrap()
    }

    fn step(v: u8) -> SpeedStep {
        SpeedStep::new(v).unwrap()
    }

    #[test]
    fn speed_step_valid() {
        for v in 1..=6 {
            assert_eq!(step(v).value(), v);
        }
    }

    #[test]
    fn speed_step_invalid() {
        assert!(SpeedStep::new(0).is_err());
        assert!(SpeedStep::new(7).is_err());
    }

    #[test]
    fn from_percent_extremes() {
        assert_eq!(SpeedStep::from_percent(Percent::MIN).value(), 1);
        assert_eq!(SpeedStep::from_percent(Percent::MAX).value(), 6);
    }

    #[test]
    fn from_percent_band_edges() {
        assert_eq!(SpeedStep::from_percent(pct(16)).value(), 1);
        assert_eq!(SpeedStep::from_percent(pct(17)).value(), 2);
        assert_eq!(SpeedStep::from_percent(pct(33)).value(), 2);
        assert_eq!(SpeedStep::from_percent(pct(34)).value(), 3);
        assert_eq!(SpeedStep::from_percent(pct(50)).value(), 3);
        assert_eq!(SpeedStep::from_percent(pct(51)).value(), 4);
        assert_eq!(SpeedStep::from_percent(pct(66)).value(), 4);
        assert_eq!(SpeedStep::from_percent(pct(67)).value(), 5);
        assert_eq!(SpeedStep::from_percent(pct(70)).value(), 5);
        assert_eq!(SpeedStep::from_percent(pct(83)).value(), 5);
        assert_eq!(SpeedStep::from_percent(pct(84)).value(), 6);
    }

    #[test]
    fn from_percent_is_monotonic_and_covers_all_steps() {
        let steps: Vec<u8> = (0..=100)
            .map(|p| SpeedStep::from_percent(pct(p)).value())
            .collect();
        assert!(steps.windows(2).all(|w| w[0] <= w[1]));
        assert!(steps.windows(2).all(|w| w[1] - w[0] <= 1));
        assert_eq!(steps.first(), Some(&1));
        assert_eq!(steps.last(), Some(&6));
    }

    #[test]
    fn to_percent_keeps_value_inside_interior_band() {
        assert_eq!(step(3).to_percent(pct(40)), pct(40));
        assert_eq!(step(5).to_percent(pct(70)), pct(70));
        assert_eq!(step(2).to_percent(pct(15)), pct(15));
        assert_eq!(step(5).to_percent(pct(80)), pct(80));
    }

    #[test]
    fn to_percent_outside_band() {
        assert_eq!(step(1).to_percent(pct(50)), pct(10));
        assert_eq!(step(6).to_percent(pct(20)), pct(100));
        assert_eq!(step(3).to_percent(pct(10)), pct(30));
        assert_eq!(step(4).to_percent(pct(90)), pct(50));
        assert_eq!(step(2).to_percent(pct(0)), pct(15));
    }

    #[test]
    fn to_percent_pins_extremes_by_default() {
        assert_eq!(step(1).to_percent(pct(5)).value(), 10);
        assert_eq!(step(6).to_percent(pct(90)).value(), 100);
        assert_eq!(step(3).to_percent(pct(40)).value(), 40);
        assert_eq!(step(3).to_percent(pct(10)).value(), 30);
    }

    #[test]
    fn to_percent_keep_in_band_preserves_extremes() {
        let keep = BandPolicy::KeepInBand;
        assert_eq!(step(1).to_percent_with(pct(5), keep).value(), 5);
        assert_eq!(step(1).to_percent_with(pct(20), keep).value(), 10);
        assert_eq!(step(6).to_percent_with(pct(90), keep).value(), 90);
        assert_eq!(step(6).to_percent_with(pct(60), keep).value(), 100);
        assert_eq!(step(3).to_percent_with(pct(40), keep).value(), 40);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(step(1).band(), (0, 15));
        assert_eq!(step(3).band(), (30, 50));
        assert_eq!(step(6).band(), (80, 100));
    }
}
