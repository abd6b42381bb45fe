//! Whole-match behaviour through the public API.

use anyo_flappy::obstacle::{Field, Obstacle};
use anyo_flappy::scoring::ScoreTracker;
use anyo_flappy::{FileStore, Game, GameEvent, HighScoreStore, MemoryStore, Phase, Tuning};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tempfile::TempDir;

const FRAME: Duration = Duration::from_millis(16);

/// Softer physics and a wide gap so a simple hover-at-the-gap pilot never
/// misses.
fn pilot_tuning() -> Tuning {
    Tuning {
        gravity: 0.3,
        jump_impulse: -6.0,
        gap: 350.0,
        ..Tuning::default()
    }
}

fn new_game(tuning: Tuning, store: Box<dyn HighScoreStore>, seed: u64) -> Game {
    Game::new(tuning, 1000.0, store, StdRng::seed_from_u64(seed))
}

/// Flap whenever the bird has sunk below the middle of the next gap.
fn autopilot(game: &mut Game, now: Duration) {
    let tuning = game.tuning();
    let bird = game.bird();
    let target = match game.obstacles().iter().find(|o| !o.passed) {
        Some(o) => o.gap_top + tuning.gap / 2.0 - tuning.bird_size / 2.0,
        None => tuning.bird_start_y,
    };
    if bird.y > target && bird.velocity >= 0.0 {
        game.jump(now);
    }
}

/// Fly with the pilot until `score` is reached. Returns the clock.
fn fly_until(game: &mut Game, score: u32, mut now: Duration) -> Duration {
    for _ in 0..20_000 {
        if game.score() >= score {
            return now;
        }
        autopilot(game, now);
        assert!(game.frame(now), "match ended at score {}", game.score());
        now += FRAME;
    }
    panic!("pilot never reached {score}");
}

/// Stop flapping and let gravity finish the match.
fn crash(game: &mut Game, mut now: Duration) -> Duration {
    while game.frame(now) {
        now += FRAME;
    }
    now
}

#[test]
fn test_match_lifecycle() {
    let mut game = new_game(Tuning::default(), Box::new(MemoryStore::default()), 1);
    assert_eq!(game.phase(), Phase::NotStarted);

    game.jump(Duration::ZERO);
    assert_eq!(game.phase(), Phase::NotStarted);

    game.start();
    assert_eq!(game.phase(), Phase::Running);

    let now = crash(&mut game, Duration::ZERO);
    assert_eq!(game.phase(), Phase::Over);
    assert!(!game.is_frame_pending());
    assert!(!game.frame(now + FRAME));
}

#[test]
fn test_pilot_scores_and_speeds_up() {
    let store = MemoryStore::default();
    let mut game = new_game(pilot_tuning(), Box::new(store.clone()), 11);
    game.start();

    let mut last_speed = game.speed();
    let mut now = Duration::ZERO;
    let mut speed_ups = Vec::new();
    let mut scored = Vec::new();
    while game.score() < 12 {
        autopilot(&mut game, now);
        assert!(game.frame(now), "crashed at score {}", game.score());
        now += FRAME;
        assert!(game.speed() >= last_speed);
        assert!(game.speed() <= game.tuning().speed_cap);
        last_speed = game.speed();
        for event in game.drain_events() {
            match event {
                GameEvent::SpeedUp { level, .. } => speed_ups.push(level),
                GameEvent::Scored { score } => scored.push(score),
                _ => {}
            }
        }
        assert!(now < Duration::from_secs(120));
    }

    assert_eq!(scored, (1..=12).collect::<Vec<_>>());
    assert_eq!(speed_ups, vec![2, 3]);
    assert!((game.speed() - 1.04).abs() < 1e-9);
    assert_eq!(game.high_score(), 12);
    assert_eq!(store.value(), Some(12));
    // Every obstacle on screen scored at most once.
    let passed = game.obstacles().iter().filter(|o| o.passed).count();
    assert!(passed <= 12);
}

#[test]
fn test_reset_after_game_over() {
    let mut game = new_game(pilot_tuning(), Box::new(MemoryStore::default()), 5);
    game.start();
    let now = fly_until(&mut game, 6, Duration::ZERO);
    let now = crash(&mut game, now);
    assert!(game.is_over());
    // Falling past one more obstacle on the way down may add a point.
    let best = game.high_score();
    assert!(best >= 6);
    assert!(game.is_new_high_score());
    assert!(game.speed() > game.tuning().initial_speed);

    game.start();
    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.score(), 0);
    assert!(game.obstacles().is_empty());
    assert_eq!(game.speed(), game.tuning().initial_speed);
    assert_eq!(game.bird().y, game.tuning().bird_start_y);
    assert_eq!(game.bird().velocity, 0.0);
    assert_eq!(game.high_score(), best);

    // First frame of the new match spawns straight away.
    assert!(game.frame(now));
    assert_eq!(game.obstacles().len(), 1);
}

#[test]
fn test_high_score_survives_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anyoFlappyHighScore");

    let mut first = new_game(pilot_tuning(), Box::new(FileStore::new(&path)), 21);
    first.start();
    let now = fly_until(&mut first, 4, Duration::ZERO);
    crash(&mut first, now);
    let best = first.high_score();
    assert!(best >= 4);
    assert_eq!(FileStore::new(&path).load(), best);

    // A weaker run leaves the stored best alone.
    let mut second = new_game(pilot_tuning(), Box::new(FileStore::new(&path)), 22);
    assert_eq!(second.high_score(), best);
    second.start();
    let now = fly_until(&mut second, 2, Duration::ZERO);
    crash(&mut second, now);
    assert!(second.score() < best);
    assert_eq!(second.high_score(), best);
    assert!(!second.is_new_high_score());
    assert_eq!(FileStore::new(&path).load(), best);

    let third = new_game(pilot_tuning(), Box::new(FileStore::new(&path)), 23);
    assert_eq!(third.high_score(), best);
}

#[test]
fn test_malformed_high_score_starts_at_zero() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anyoFlappyHighScore");
    std::fs::write(&path, "NaN").unwrap();
    let game = new_game(Tuning::default(), Box::new(FileStore::new(&path)), 0);
    assert_eq!(game.high_score(), 0);
}

#[test]
fn test_gap_pass_scenario() {
    let tuning = Tuning {
        gap: 250.0,
        ..Tuning::default()
    };
    let mut bird = anyo_flappy::bird::Bird::new(&tuning);
    let obstacle = Obstacle {
        x: bird.x - 10.0,
        gap_top: 200.0,
        passed: false,
    };
    bird.y = 300.0;
    assert!(!obstacle.hits(&bird, &tuning));
    bird.y = 100.0;
    assert!(obstacle.hits(&bird, &tuning));

    let field = Field {
        width: 1000.0,
        height: tuning.field_height,
    };
    bird.y = 0.0;
    assert!(field.out_of_bounds(&bird, &tuning));
    bird.y = field.height - tuning.bird_size;
    assert!(field.out_of_bounds(&bird, &tuning));
}

#[test]
fn test_speed_steps_at_five_and_ten() {
    let tuning = Tuning::default();
    let mut tracker = ScoreTracker::new(&tuning, 0);
    let mut speeds = vec![tracker.speed()];
    for _ in 0..10 {
        tracker.add_point(&tuning);
        speeds.push(tracker.speed());
    }
    let steps: Vec<_> = speeds
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0])
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(steps, vec![5, 10]);
}
