use crate::bird::Bird;
use crate::config::Tuning;
use rand::Rng;

/// Play-field extent in world units. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Field {
    /// True once the bird touches the ceiling or the floor.
    pub fn out_of_bounds(&self, bird: &Bird, tuning: &Tuning) -> bool {
        bird.y <= 0.0 || bird.y >= self.height - tuning.bird_size
    }
}

/// A spike pair: solid from the top down to `gap_top`, open for `gap`
/// units, solid again down to the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub gap_top: f64,
    /// Set once the trailing edge has crossed the bird.
    pub passed: bool,
}

impl Obstacle {
    /// A fresh pair at the right edge with a random gap that keeps at least
    /// `spawn_margin` of spike above and below it.
    pub fn spawn<R: Rng>(field: &Field, tuning: &Tuning, rng: &mut R) -> Self {
        let min = tuning.spawn_margin;
        let max = field.height - tuning.gap - tuning.spawn_margin;
        let gap_top = if max > min {
            rng.gen_range(min..max).floor()
        } else {
            min
        };

        Self {
            x: field.width,
            gap_top,
            passed: false,
        }
    }

    /// Scroll left by `distance`. Returns true the one time the trailing
    /// edge crosses `bird_x`.
    pub fn advance(&mut self, distance: f64, bird_x: f64, width: f64) -> bool {
        self.x -= distance;
        if !self.passed && self.x + width < bird_x {
            self.passed = true;
            return true;
        }
        false
    }

    /// Still (partly) visible at the left edge.
    pub fn on_screen(&self, width: f64) -> bool {
        self.x > -width
    }

    pub fn gap_bottom(&self, tuning: &Tuning) -> f64 {
        self.gap_top + tuning.gap
    }

    pub fn overlaps_column(&self, bird: &Bird, tuning: &Tuning) -> bool {
        bird.x + tuning.bird_size > self.x && bird.x < self.x + tuning.obstacle_width
    }

    /// Strictly inside the opening, edges count as a hit.
    pub fn in_gap(&self, bird: &Bird, tuning: &Tuning) -> bool {
        bird.y > self.gap_top && bird.y + tuning.bird_size < self.gap_bottom(tuning)
    }

    pub fn hits(&self, bird: &Bird, tuning: &Tuning) -> bool {
        self.overlaps_column(bird, tuning) && !self.in_gap(bird, tuning)
    }
}
