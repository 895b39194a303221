//! Construction-time configuration for each effect.
//!
//! Defaults reproduce the site's look. `validate()` is called by the effect
//! constructors; a config that fails validation yields an inert effect.

use crate::error::{positive, ConfigError};
use crate::proximity::{parse_variation_settings, Falloff};

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    /// Any CSS color string accepted by the drawing surface.
    pub color: String,
    pub magnet_radius: f32,
    pub ring_radius: f32,
    pub particle_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 80,
            color: "#b8864e".to_string(),
            magnet_radius: 120.0,
            ring_radius: 80.0,
            particle_size: 3.0,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::NonPositiveCount);
        }
        positive("magnet radius", self.magnet_radius)?;
        positive("particle size", self.particle_size)?;
        if !(self.ring_radius.is_finite() && self.ring_radius >= 0.0) {
            return Err(ConfigError::NegativeRingRadius(self.ring_radius));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProximityConfig {
    pub label: String,
    /// Rest settings, e.g. `'wght' 400, 'opsz' 9`. Defines the axis set.
    pub near_settings: String,
    /// Settings reached when the pointer sits on a glyph.
    pub far_settings: String,
    pub radius: f32,
    pub falloff: Falloff,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            near_settings: "'wght' 400, 'opsz' 9".to_string(),
            far_settings: "'wght' 1000, 'opsz' 40".to_string(),
            radius: 50.0,
            falloff: Falloff::Linear,
        }
    }
}

impl ProximityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("radius", self.radius)?;
        if parse_variation_settings(&self.near_settings).is_empty() {
            return Err(ConfigError::NoAxes(self.near_settings.clone()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MagneticConfig {
    /// Fraction of the pointer's offset from the element center to follow.
    pub strength: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: 0.3,
            stiffness: 200.0,
            damping: 15.0,
        }
    }
}

impl MagneticConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("strength", self.strength)?;
        positive("stiffness", self.stiffness)?;
        positive("damping", self.damping)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrambleConfig {
    pub label: String,
    /// Glyphs closer than this to the pointer start scrambling.
    pub radius: f32,
    /// Scramble time for a glyph right under the pointer; shrinks linearly
    /// to zero at the radius.
    pub duration_sec: f32,
    /// Swap rate multiplier; 1 swaps the shown character every frame.
    pub speed: f32,
    /// Characters shown while scrambling.
    pub chars: String,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            radius: 100.0,
            duration_sec: 1.2,
            speed: 0.5,
            chars: ".:".to_string(),
        }
    }
}

impl ScrambleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("radius", self.radius)?;
        positive("duration", self.duration_sec)?;
        positive("speed", self.speed)?;
        if self.chars.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }
        Ok(())
    }
}
