// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air conditioner set point.
//!
//! This module provides a type-safe representation of the target temperature,
//! ensuring values are always within the valid range of 16-30 °C.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValueError;

/// Target temperature in degrees Celsius (16-30).
///
/// The value is meaningful only while the air conditioner is on, but it is
/// kept (and clamped) regardless.
///
/// Deserialization clamps instead of failing, so documents coming from the
/// remote mirror always yield a valid set point.
///
/// # Examples
///
/// ```
/// use home_scenes::types::Temperature;
///
/// let t = Temperature::new(24).unwrap();
/// assert_eq!(t.value(), 24);
///
/// assert_eq!(Temperature::clamped(40), Temperature::MAX);
/// assert_eq!(Temperature::MIN.step(-1), Temperature::MIN);
///
/// assert!(Temperature::new(15).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Temperature(u8);

impl Temperature {
    /// Lowest accepted set point.
    pub const MIN: Self = Self(16);

    /// Highest accepted set point.
    pub const MAX: Self = Self(30);

    /// Set point at session start.
    pub const DEFAULT: Self = Self(22);

    /// Creates a new temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside 16-30.
    pub fn new(value: i32) -> Result<Self, ValueError> {
        if !(i32::from(Self::MIN.0)..=i32::from(Self::MAX.0)).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: i32::from(Self::MIN.0),
                max: i32::from(Self::MAX.0),
                actual: value,
            });
        }
        Ok(Self::clamped(value))
    }

    /// Creates a temperature, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i32) -> Self {
        // Safe: clamped into 16..=30
        Self(value.clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0)) as u8)
    }

    /// Returns the temperature moved by `delta` degrees, clamped.
    #[must_use]
    pub fn step(self, delta: i8) -> Self {
        Self::clamped(i32::from(self.0) + i32::from(delta))
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl TryFrom<i32> for Temperature {
    type Error = ValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Temperature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        let bounded = i32::try_from(raw).unwrap_or(if raw < 0 { i32::MIN } else { i32::MAX });
        Ok(Self::clamped(bounded))
    }
}
