use crate::game::GameEvent;
use std::collections::VecDeque;
use std::time::Duration;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires: Duration,
}

/// Short-lived on-screen messages, newest last.
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Duration) {
        let message = message.into();
        tracing::debug!("toast: {}", message);
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            kind,
            message,
            expires: now + TOAST_LIFETIME,
        });
    }

    /// Turn a game event into a toast, for the events that have one.
    pub fn on_event(&mut self, event: &GameEvent, now: Duration) {
        match *event {
            GameEvent::Started => {
                self.push(ToastKind::Success, "Game Started! Fly the ANYO!", now)
            }
            GameEvent::SpeedUp { level, .. } => {
                self.push(ToastKind::Info, format!("Speed increased! Level {level}"), now)
            }
            GameEvent::NewHighScore { .. } => self.push(ToastKind::Success, "New High Score!", now),
            GameEvent::GameOver { .. } => self.push(ToastKind::Error, "Game Over!", now),
            GameEvent::Flap | GameEvent::Scored { .. } => {}
        }
    }

    pub fn expire(&mut self, now: Duration) {
        self.queue.retain(|t| t.expires > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
