use crate::config::Tuning;

/// The player. Only `y` moves; `x` is fixed for the whole match.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Tilt in degrees, for drawing only.
    pub rotation: f64,
}

impl Bird {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.bird_x,
            y: tuning.bird_start_y,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    /// One tick of gravity integration. Velocity is never clamped.
    pub fn fall(&mut self, tuning: &Tuning) {
        self.velocity += tuning.gravity;
        self.y += self.velocity;
        self.rotation = (self.velocity * tuning.rotation_gain)
            .clamp(tuning.rotation_min, tuning.rotation_max);
    }

    pub fn flap(&mut self, tuning: &Tuning) {
        self.velocity = tuning.jump_impulse;
    }
}
