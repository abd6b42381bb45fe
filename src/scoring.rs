use crate::config::Tuning;

/// What a single point changed, beyond the score itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointOutcome {
    pub score: u32,
    /// Set on every level boundary, even once the speed is capped.
    pub speed_up: Option<SpeedUp>,
    /// Set when the point beat the stored best.
    pub new_high_score: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedUp {
    pub level: u32,
    pub speed: f64,
}

/// Score, obstacle speed and best score for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    score: u32,
    speed: f64,
    high_score: u32,
}

impl ScoreTracker {
    pub fn new(tuning: &Tuning, high_score: u32) -> Self {
        Self {
            score: 0,
            speed: tuning.initial_speed,
            high_score,
        }
    }

    /// New match. The best score survives.
    pub fn reset(&mut self, tuning: &Tuning) {
        self.score = 0;
        self.speed = tuning.initial_speed;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Difficulty level as shown to the player, starting at 1.
    pub fn level(&self, tuning: &Tuning) -> u32 {
        self.score / tuning.points_per_level.max(1) + 1
    }

    pub fn add_point(&mut self, tuning: &Tuning) -> PointOutcome {
        self.score += 1;

        let mut speed_up = None;
        if self.score % tuning.points_per_level.max(1) == 0 {
            self.speed = (self.speed + tuning.speed_increment).min(tuning.speed_cap);
            speed_up = Some(SpeedUp {
                level: self.level(tuning),
                speed: self.speed,
            });
        }

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }

        PointOutcome {
            score: self.score,
            speed_up,
            new_high_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_increments_by_one() {
        let tuning = Tuning::default();
        let mut tracker = ScoreTracker::new(&tuning, 100);
        for expected in 1..=4 {
            let outcome = tracker.add_point(&tuning);
            assert_eq!(outcome.score, expected);
            assert!(outcome.speed_up.is_none());
            assert!(!outcome.new_high_score);
        }
        assert_eq!(tracker.speed(), tuning.initial_speed);
    }

    #[test]
    fn test_speed_rises_every_five_points() {
        let tuning = Tuning::default();
        let mut tracker = ScoreTracker::new(&tuning, 0);
        let mut rises = Vec::new();
        for _ in 0..10 {
            if let Some(up) = tracker.add_point(&tuning).speed_up {
                rises.push((tracker.score(), up.level));
            }
        }
        assert_eq!(rises, vec![(5, 2), (10, 3)]);
        assert!((tracker.speed() - (1.0 + 2.0 * 0.02)).abs() < 1e-9);
    }

    #[test]
    fn test_speed_never_exceeds_cap() {
        let tuning = Tuning {
            speed_increment: 0.5,
            ..Tuning::default()
        };
        let mut tracker = ScoreTracker::new(&tuning, 0);
        let mut last = tracker.speed();
        let mut rises = 0;
        for _ in 0..100 {
            if tracker.add_point(&tuning).speed_up.is_some() {
                rises += 1;
            }
            assert!(tracker.speed() >= last);
            assert!(tracker.speed() <= tuning.speed_cap);
            last = tracker.speed();
        }
        // 1.0 -> 1.5 -> 2.0 -> 2.5 -> 3.0, then pinned. Every fifth point
        // still announces the new level.
        assert_eq!(rises, 20);
        assert_eq!(tracker.speed(), 3.0);
    }

    #[test]
    fn test_level_announced_at_cap() {
        let tuning = Tuning {
            speed_cap: 1.0,
            ..Tuning::default()
        };
        let mut tracker = ScoreTracker::new(&tuning, 0);
        let mut ups = Vec::new();
        for _ in 0..10 {
            if let Some(up) = tracker.add_point(&tuning).speed_up {
                ups.push(up);
            }
        }
        assert_eq!(
            ups,
            vec![
                SpeedUp { level: 2, speed: 1.0 },
                SpeedUp { level: 3, speed: 1.0 },
            ]
        );
        assert_eq!(tracker.speed(), 1.0);
    }

    #[test]
    fn test_high_score_tracks_max() {
        let tuning = Tuning::default();
        let mut tracker = ScoreTracker::new(&tuning, 2);
        assert!(!tracker.add_point(&tuning).new_high_score);
        assert!(!tracker.add_point(&tuning).new_high_score);
        assert!(tracker.add_point(&tuning).new_high_score);
        assert_eq!(tracker.high_score(), 3);

        tracker.reset(&tuning);
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.high_score(), 3);
        assert!(!tracker.add_point(&tuning).new_high_score);
    }

    #[test]
    fn test_reset_restores_speed() {
        let tuning = Tuning::default();
        let mut tracker = ScoreTracker::new(&tuning, 0);
        for _ in 0..15 {
            tracker.add_point(&tuning);
        }
        assert!(tracker.speed() > tuning.initial_speed);
        tracker.reset(&tuning);
        assert_eq!(tracker.speed(), tuning.initial_speed);
        assert_eq!(tracker.level(&tuning), 1);
    }
}
