// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rooms with a controllable light.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A room whose light the panel controls.
///
/// # Examples
///
/// ```
/// use home_scenes::types::Room;
///
/// assert_eq!("kitchen".parse::<Room>().unwrap(), Room::Kitchen);
/// assert_eq!(Room::LivingRoom.as_str(), "livingRoom");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Room {
    /// Living room.
    LivingRoom,
    /// Kitchen.
    Kitchen,
    /// Bedroom.
    Bedroom,
}

impl Room {
    /// All rooms in display order.
    pub const ALL: [Self; 3] = [Self::LivingRoom, Self::Kitchen, Self::Bedroom];

    /// Returns the identifier used in documents and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LivingRoom => "livingRoom",
            Self::Kitchen => "kitchen",
            Self::Bedroom => "bedroom",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Room {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "livingroom" | "living" => Ok(Self::LivingRoom),
            "kitchen" => Ok(Self::Kitchen),
            "bedroom" => Ok(Self::Bedroom),
            _ => Err(ValueError::InvalidRoom(s.to_string())),
        }
    }
}
