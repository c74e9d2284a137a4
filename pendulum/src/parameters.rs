use serde::{Deserialize, Serialize};

use crate::PendulumErrors;

/// Gravitational acceleration used by default (m/s^2).
pub const GRAVITY: f64 = 9.8;

/// Default lower bound on the normalized shared denominator of the equations of motion.
pub const DEFAULT_SINGULARITY_TOLERANCE: f64 = 1e-9;

/// Physical parameters of a double pendulum with point masses on massless rods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoublePendulumParameters {
    /// Mass of the first bob (kg).
    pub m1: f64,
    /// Mass of the second bob (kg).
    pub m2: f64,
    /// Length of the first rod (m).
    pub l1: f64,
    /// Length of the second rod (m).
    pub l2: f64,
    /// Gravitational acceleration (m/s^2).
    pub g: f64,
    pub singularity_tolerance: f64,
}

impl Default for DoublePendulumParameters {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            l1: 1.0,
            l2: 1.0,
            g: GRAVITY,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
        }
    }
}

impl DoublePendulumParameters {
    pub fn with_masses(mut self, m1: f64, m2: f64) -> Self {
        self.m1 = m1;
        self.m2 = m2;
        self
    }

    pub fn with_lengths(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), PendulumErrors> {
        positive("m1", self.m1)?;
        positive("m2", self.m2)?;
        positive("l1", self.l1)?;
        positive("l2", self.l2)?;
        positive("g", self.g)?;
        tolerance(self.singularity_tolerance)
    }
}

/// Physical parameters of a double pendulum hanging from a cart on a horizontal rail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPendulumParameters {
    /// Mass of the first bob (kg).
    pub m1: f64,
    /// Mass of the second bob (kg).
    pub m2: f64,
    /// Mass of the cart (kg).
    pub cart_mass: f64,
    /// Length of the first rod (m).
    pub l1: f64,
    /// Length of the second rod (m).
    pub l2: f64,
    /// Gravitational acceleration (m/s^2).
    pub g: f64,
    /// Viscous friction between cart and rail (N s/m).
    pub cart_damping: f64,
    pub singularity_tolerance: f64,
}

impl Default for CartPendulumParameters {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            cart_mass: 1.0,
            l1: 1.0,
            l2: 1.0,
            g: GRAVITY,
            cart_damping: 0.0,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
        }
    }
}

impl CartPendulumParameters {
    pub fn with_masses(mut self, m1: f64, m2: f64, cart_mass: f64) -> Self {
        self.m1 = m1;
        self.m2 = m2;
        self.cart_mass = cart_mass;
        self
    }

    pub fn with_lengths(mut self, l1: f64, l2: f64) -> Self {
        self.l1 = l1;
        self.l2 = l2;
        self
    }

    pub fn with_gravity(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_cart_damping(mut self, damping: f64) -> Self {
        self.cart_damping = damping;
        self
    }

    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), PendulumErrors> {
        positive("m1", self.m1)?;
        positive("m2", self.m2)?;
        positive("cart_mass", self.cart_mass)?;
        positive("l1", self.l1)?;
        positive("l2", self.l2)?;
        positive("g", self.g)?;
        if !self.cart_damping.is_finite() || self.cart_damping < 0.0 {
            return Err(PendulumErrors::InvalidParameters(format!(
                "cart_damping must be finite and non-negative, got {}",
                self.cart_damping
            )));
        }
        tolerance(self.singularity_tolerance)
    }
}

fn positive(name: &str, value: f64) -> Result<(), PendulumErrors> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PendulumErrors::InvalidParameters(format!(
            "{name} must be finite and greater than zero, got {value}"
        )))
    }
}

fn tolerance(value: f64) -> Result<(), PendulumErrors> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(PendulumErrors::InvalidParameters(format!(
            "singularity_tolerance must lie in (0, 1), got {value}"
        )))
    }
}
