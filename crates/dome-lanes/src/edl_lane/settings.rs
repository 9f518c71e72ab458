// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-facing configuration of the eye-dome lighting lane.

use std::fmt;

use super::cascade::LEVEL_COUNT;
use dome_core::math::FRAC_PI_2;
use dome_core::renderer::SmoothingParams;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Smoothing configuration of one cascade level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSettings {
    /// Whether the level is smoothed at all.
    pub enabled: bool,
    /// Half size of the kernel, in pixels.
    pub half_size: u32,
    /// Spatial standard deviation, in pixels.
    pub sigma: f32,
    /// Depth standard deviation.
    pub sigma_z: f32,
}

impl SmoothingSettings {
    /// An enabled level with the given kernel.
    pub const fn enabled(half_size: u32, sigma: f32, sigma_z: f32) -> Self {
        Self {
            enabled: true,
            half_size,
            sigma,
            sigma_z,
        }
    }

    /// The kernel parameters handed to the sub-filter.
    pub fn params(&self) -> SmoothingParams {
        SmoothingParams {
            half_size: self.half_size,
            sigma: self.sigma,
            sigma_z: self.sigma_z,
        }
    }
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        let params = SmoothingParams::default();
        Self {
            enabled: false,
            half_size: params.half_size,
            sigma: params.sigma,
            sigma_z: params.sigma_z,
        }
    }
}

/// Construction-time settings of an [`EdlFilter`](super::EdlFilter).
///
/// Missing fields fall back to [`EdlSettings::default`] when deserializing.
/// This holds per level too: a `smoothing` entry only overrides the fields it
/// names, the rest come from that level's default, and a list shorter than
/// the cascade leaves the remaining levels at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdlSettings {
    /// Exponential falloff scale of the shading term.
    pub strength: f32,
    /// Azimuth of the light, in radians.
    pub light_theta: f32,
    /// Polar angle of the light measured from the pole, in radians.
    pub light_phi: f32,
    /// Smoothing of the full, half and quarter resolution levels.
    #[serde(deserialize_with = "deserialize_smoothing_levels")]
    pub smoothing: [SmoothingSettings; LEVEL_COUNT],
}

impl Default for EdlSettings {
    fn default() -> Self {
        Self {
            strength: 100.0,
            light_theta: FRAC_PI_2,
            light_phi: FRAC_PI_2,
            smoothing: default_smoothing_levels(),
        }
    }
}

fn default_smoothing_levels() -> [SmoothingSettings; LEVEL_COUNT] {
    [
        SmoothingSettings {
            enabled: false,
            half_size: 1,
            sigma: 1.0,
            sigma_z: 0.2,
        },
        SmoothingSettings::enabled(2, 2.0, 0.4),
        SmoothingSettings::enabled(2, 2.0, 0.4),
    ]
}

/// The fields a settings file names for one level.
#[derive(Deserialize)]
struct SmoothingOverride {
    #[serde(default, deserialize_with = "present")]
    enabled: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    half_size: Option<u32>,
    #[serde(default, deserialize_with = "present")]
    sigma: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    sigma_z: Option<f32>,
}

impl SmoothingOverride {
    fn apply_to(self, base: SmoothingSettings) -> SmoothingSettings {
        SmoothingSettings {
            enabled: self.enabled.unwrap_or(base.enabled),
            half_size: self.half_size.unwrap_or(base.half_size),
            sigma: self.sigma.unwrap_or(base.sigma),
            sigma_z: self.sigma_z.unwrap_or(base.sigma_z),
        }
    }
}

// Reads a named field as a plain value, not `Some(..)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

struct SmoothingLevelsVisitor;

impl<'de> Visitor<'de> for SmoothingLevelsVisitor {
    type Value = [SmoothingSettings; LEVEL_COUNT];

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at most {LEVEL_COUNT} smoothing levels")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut levels = default_smoothing_levels();
        let mut count = 0;
        while let Some(entry) = seq.next_element::<SmoothingOverride>()? {
            let Some(level) = levels.get_mut(count) else {
                return Err(de::Error::invalid_length(count + 1, &self));
            };
            *level = entry.apply_to(*level);
            count += 1;
        }
        Ok(levels)
    }
}

fn deserialize_smoothing_levels<'de, D>(
    deserializer: D,
) -> Result<[SmoothingSettings; LEVEL_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_tuple(LEVEL_COUNT, SmoothingLevelsVisitor)
}

impl EdlSettings {
    /// Returns these settings with smoothing disabled on every level.
    pub fn without_smoothing(mut self) -> Self {
        for level in &mut self.smoothing {
            level.enabled = false;
        }
        self
    }

    /// Parses settings from JSON.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Parses settings from RON.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Serializes settings to pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
