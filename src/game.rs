use crate::bird::Bird;
use crate::config::Tuning;
use crate::frame::FrameScheduler;
use crate::obstacle::{Field, Obstacle};
use crate::scoring::ScoreTracker;
use crate::store::HighScoreStore;
use rand::rngs::StdRng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Ceiling,
    Floor,
    Obstacle,
}

/// Fire-and-forget notifications, drained by the host after each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Flap,
    Scored { score: u32 },
    SpeedUp { level: u32, speed: f64 },
    /// First point of the match that beats the stored best.
    NewHighScore { score: u32 },
    GameOver {
        score: u32,
        high_score: u32,
        cause: DeathCause,
    },
}

/// The single authoritative match state. Every mutation goes through
/// `frame` (the driver tick) or the `start`/`jump` controls.
pub struct Game {
    tuning: Tuning,
    field: Field,
    bird: Bird,
    obstacles: Vec<Obstacle>,
    scores: ScoreTracker,
    phase: Phase,
    last_spawn: Option<Duration>,
    flap_until: Option<Duration>,
    beat_high_score: bool,
    frames: FrameScheduler,
    store: Box<dyn HighScoreStore>,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl Game {
    /// Reads the stored high score once; the match waits for `start`.
    pub fn new(
        tuning: Tuning,
        field_width: f64,
        store: Box<dyn HighScoreStore>,
        rng: StdRng,
    ) -> Self {
        let high_score = store.load();
        tracing::info!("loaded high score {}", high_score);
        Self {
            field: Field {
                width: field_width,
                height: tuning.field_height,
            },
            bird: Bird::new(&tuning),
            obstacles: Vec::new(),
            scores: ScoreTracker::new(&tuning, high_score),
            phase: Phase::NotStarted,
            last_spawn: None,
            flap_until: None,
            beat_high_score: false,
            frames: FrameScheduler::new(),
            store,
            rng,
            events: Vec::new(),
            tuning,
        }
    }

    // ── Controls ────────────────────────────────────────────────────────

    /// Back to a fresh, not-yet-started match. Keeps the high score.
    pub fn reset(&mut self) {
        self.frames.cancel();
        self.bird = Bird::new(&self.tuning);
        self.obstacles.clear();
        self.scores.reset(&self.tuning);
        self.phase = Phase::NotStarted;
        self.last_spawn = None;
        self.flap_until = None;
        self.beat_high_score = false;
    }

    /// Reset, then run. Also the "try again" action after a crash.
    pub fn start(&mut self) {
        self.reset();
        self.phase = Phase::Running;
        self.frames.request();
        self.events.push(GameEvent::Started);
        tracing::info!("match started, best {}", self.scores.high_score());
    }

    /// The one player action. Ignored before the first start; after a crash
    /// it restarts and the flap carries into the new match.
    pub fn jump(&mut self, now: Duration) {
        match self.phase {
            Phase::NotStarted => return,
            Phase::Over => self.start(),
            Phase::Running => {}
        }
        self.bird.flap(&self.tuning);
        self.flap_until = Some(now + self.tuning.flap_duration);
        self.events.push(GameEvent::Flap);
    }

    /// Teardown: no queued frame may run after this.
    pub fn stop(&mut self) {
        if self.frames.cancel().is_some() {
            tracing::debug!("cancelled pending frame");
        }
    }

    /// Follow the host's aspect ratio. Obstacles keep their positions.
    pub fn resize(&mut self, field_width: f64) {
        self.field.width = field_width;
    }

    // ── Driver ──────────────────────────────────────────────────────────

    /// Run the pending frame, if one is queued. Returns whether a tick ran.
    pub fn frame(&mut self, now: Duration) -> bool {
        if self.frames.fire().is_none() {
            return false;
        }
        self.tick(now);
        true
    }

    fn tick(&mut self, now: Duration) {
        if self.flap_until.is_some_and(|until| now >= until) {
            self.flap_until = None;
        }

        if self.spawn_due(now) {
            let obstacle = Obstacle::spawn(&self.field, &self.tuning, &mut self.rng);
            tracing::debug!("spawned obstacle gap_top={}", obstacle.gap_top);
            self.obstacles.push(obstacle);
            self.last_spawn = Some(now);
        }

        self.bird.fall(&self.tuning);

        let distance = self.scores.speed() * self.tuning.scroll_factor;
        let width = self.tuning.obstacle_width;
        let mut passes = 0;
        for obstacle in &mut self.obstacles {
            if obstacle.advance(distance, self.bird.x, width) {
                passes += 1;
            }
        }
        self.obstacles.retain(|o| o.on_screen(width));

        for _ in 0..passes {
            self.add_point();
        }

        if self.field.out_of_bounds(&self.bird, &self.tuning) {
            let cause = if self.bird.y <= 0.0 {
                DeathCause::Ceiling
            } else {
                DeathCause::Floor
            };
            self.game_over(cause);
            return;
        }

        if self
            .obstacles
            .iter()
            .any(|o| o.hits(&self.bird, &self.tuning))
        {
            self.game_over(DeathCause::Obstacle);
            return;
        }

        self.frames.request();
    }

    fn spawn_due(&self, now: Duration) -> bool {
        match self.last_spawn {
            None => true,
            Some(last) => {
                let interval = self.tuning.spawn_interval.as_secs_f64() / self.scores.speed();
                now.saturating_sub(last).as_secs_f64() >= interval
            }
        }
    }

    fn add_point(&mut self) {
        let outcome = self.scores.add_point(&self.tuning);
        self.events.push(GameEvent::Scored {
            score: outcome.score,
        });

        if let Some(up) = outcome.speed_up {
            tracing::info!("speed increased to {:.2} (level {})", up.speed, up.level);
            self.events.push(GameEvent::SpeedUp {
                level: up.level,
                speed: up.speed,
            });
        }

        if outcome.new_high_score {
            if let Err(err) = self.store.save(outcome.score) {
                tracing::warn!("could not save high score {}: {:#}", outcome.score, err);
            }
            if !self.beat_high_score {
                self.beat_high_score = true;
                self.events.push(GameEvent::NewHighScore {
                    score: outcome.score,
                });
            }
        }
    }

    fn game_over(&mut self, cause: DeathCause) {
        self.phase = Phase::Over;
        self.frames.cancel();
        self.flap_until = None;
        tracing::info!(
            "game over ({:?}): score {} best {}",
            cause,
            self.scores.score(),
            self.scores.high_score()
        );
        self.events.push(GameEvent::GameOver {
            score: self.scores.score(),
            high_score: self.scores.high_score(),
            cause,
        });
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    pub fn is_flapping(&self, now: Duration) -> bool {
        self.flap_until.is_some_and(|until| now < until)
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn high_score(&self) -> u32 {
        self.scores.high_score()
    }

    pub fn speed(&self) -> f64 {
        self.scores.speed()
    }

    pub fn level(&self) -> u32 {
        self.scores.level(&self.tuning)
    }

    /// The crash screen celebrates a run that set the best score.
    pub fn is_new_high_score(&self) -> bool {
        self.is_over() && self.score() > 0 && self.score() == self.high_score()
    }
}
