// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed scenarios present at every session start.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::state::HomeState;
use crate::types::Temperature;

use super::Preset;

/// One of the three built-in scenarios.
///
/// Each one is a full snapshot: fields a scenario does not care about are
/// still set, to the session defaults.
///
/// | scenario | living | kitchen | bedroom | AC | set point | security |
/// |----------|--------|---------|---------|----|-----------|----------|
/// | morning  | on     | on      | off     | off| 22        | off      |
/// | night    | on     | off     | on      | on | 24        | on       |
/// | away     | off    | off     | off     | off| 22        | on       |
///
/// # Examples
///
/// ```
/// use home_scenes::scenario::Builtin;
///
/// let night = Builtin::Night.state();
/// assert!(night.ac_on);
/// assert_eq!(night.temperature().value(), 24);
/// assert_eq!("away".parse::<Builtin>().unwrap(), Builtin::Away);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Morning routine.
    Morning,
    /// Night routine.
    Night,
    /// Nobody home.
    Away,
}

impl Builtin {
    /// All built-ins in display order.
    pub const ALL: [Self; 3] = [Self::Morning, Self::Night, Self::Away];

    /// Returns the fixed key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Night => "night",
            Self::Away => "away",
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Morning => "Manhã",
            Self::Night => "Noite",
            Self::Away => "Fora de casa",
        }
    }

    /// Returns the snapshot this scenario applies.
    #[must_use]
    pub fn state(&self) -> HomeState {
        match self {
            Self::Morning => HomeState {
                living_room_light: true,
                kitchen_light: true,
                bedroom_light: false,
                ac_on: false,
                temperature: Temperature::DEFAULT,
                security_active: false,
            },
            Self::Night => HomeState {
                living_room_light: true,
                kitchen_light: false,
                bedroom_light: true,
                ac_on: true,
                temperature: Temperature::clamped(24),
                security_active: true,
            },
            Self::Away => HomeState {
                living_room_light: false,
                kitchen_light: false,
                bedroom_light: false,
                ac_on: false,
                temperature: Temperature::DEFAULT,
                security_active: true,
            },
        }
    }

    /// Returns this scenario as a preset.
    #[must_use]
    pub fn preset(&self) -> Preset {
        Preset::new(self.key(), self.name(), self.state())
    }

    /// Looks up a built-in by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Builtin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| Error::not_found(s))
    }
}
