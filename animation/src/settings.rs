use serde::{Deserialize, Serialize};

use crate::AnimationErrors;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Image width (px).
    pub width: u32,
    /// Image height (px).
    pub height: u32,
    /// Target frame rate; frames are subsampled from the trajectory to approach it.
    pub fps: f64,
    /// Length of the trace left behind the second bob (s).
    pub trace: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            fps: 30.0,
            trace: 1.0,
        }
    }
}

impl AnimationSettings {
    pub fn validate(&self) -> Result<(), AnimationErrors> {
        if self.width < 100 || self.height < 100 {
            return Err(AnimationErrors::InvalidSettings(format!(
                "image must be at least 100x100 px, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(AnimationErrors::InvalidSettings(format!(
                "fps must be finite and greater than zero, got {}",
                self.fps
            )));
        }
        if !self.trace.is_finite() || self.trace < 0.0 {
            return Err(AnimationErrors::InvalidSettings(format!(
                "trace must be finite and non-negative, got {}",
                self.trace
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(AnimationSettings::default().validate().is_ok());
        let bad = [
            AnimationSettings {
                width: 10,
                ..Default::default()
            },
            AnimationSettings {
                fps: 0.0,
                ..Default::default()
            },
            AnimationSettings {
                trace: f64::NAN,
                ..Default::default()
            },
        ];
        for settings in bad {
            assert!(matches!(
                settings.validate(),
                Err(AnimationErrors::InvalidSettings(_))
            ));
        }
    }
}
