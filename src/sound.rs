use crate::game::GameEvent;
use anyhow::{Context, Result};
use fundsp::prelude32::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Flap,
    Score,
    SpeedUp,
    Death,
}

impl Effect {
    pub fn for_event(event: &GameEvent) -> Option<Effect> {
        match event {
            GameEvent::Flap => Some(Effect::Flap),
            GameEvent::Scored { .. } => Some(Effect::Score),
            GameEvent::SpeedUp { .. } => Some(Effect::SpeedUp),
            GameEvent::GameOver { .. } => Some(Effect::Death),
            GameEvent::Started | GameEvent::NewHighScore { .. } => None,
        }
    }
}

/// Pull `secs` worth of mono samples out of a generator graph.
fn render<X>(mut graph: An<X>, secs: f32, out: &mut Vec<f32>)
where
    X: AudioNode<Inputs = U0, Outputs = U1>,
{
    graph.set_sample_rate(SAMPLE_RATE as f64);
    let n = (secs * SAMPLE_RATE as f32) as usize;
    out.extend((0..n).map(|_| graph.get_mono()));
}

/// Pitch ramp `from_hz -> to_hz` over `glide` seconds into `osc`, with the
/// gain fading from `gain` to silence over `secs`.
fn sweep<O>(osc: An<O>, from_hz: f32, to_hz: f32, glide: f32, gain: f32, secs: f32, out: &mut Vec<f32>)
where
    O: AudioNode<Inputs = U1, Outputs = U1>,
{
    let freq = lfo(move |t: f32| lerp(from_hz, to_hz, (t / glide).min(1.0)));
    let fade = lfo(move |t: f32| lerp(gain, 0.0, (t / secs).min(1.0)));
    render(freq >> osc * fade, secs, out);
}

/// Mono samples for one effect at `SAMPLE_RATE`.
pub fn synth(effect: Effect) -> Vec<f32> {
    let mut out = Vec::new();
    match effect {
        Effect::Flap => sweep(sine(), 500.0, 900.0, 0.08, 0.12, 0.08, &mut out),
        Effect::Score => sweep(square(), 988.0, 1319.0, 0.12, 0.06, 0.12, &mut out),
        Effect::SpeedUp => {
            for hz in [523.0, 659.0, 784.0, 1047.0] {
                sweep(square(), hz, hz, 0.07, 0.06, 0.07, &mut out);
            }
        }
        // 400Hz down to 80Hz over 0.4s, fading out over 0.5s.
        Effect::Death => sweep(saw(), 400.0, 80.0, 0.4, 0.15, 0.5, &mut out),
    }
    out
}

/// Plays effects on the default output device. Each effect gets its own
/// detached sink so they overlap instead of queueing.
pub struct Sound {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Sound {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn play(&self, effect: Effect) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, synth(effect)));
                sink.detach();
            }
            Err(err) => tracing::warn!("could not play {:?}: {}", effect, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DeathCause;

    #[test]
    fn test_effect_lengths() {
        let sr = SAMPLE_RATE as usize;
        assert_eq!(synth(Effect::Death).len(), sr / 2);
        assert_eq!(synth(Effect::SpeedUp).len(), 4 * (0.07 * SAMPLE_RATE as f32) as usize);
        assert!(!synth(Effect::Flap).is_empty());
        assert!(!synth(Effect::Score).is_empty());
    }

    #[test]
    fn test_effects_stay_quiet() {
        for effect in [Effect::Flap, Effect::Score, Effect::SpeedUp, Effect::Death] {
            let samples = synth(effect);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 0.2));
        }
    }

    #[test]
    fn test_effects_fade_out() {
        for effect in [Effect::Flap, Effect::Score, Effect::Death] {
            let samples = synth(effect);
            let peak = |s: &[f32]| s.iter().fold(0.0f32, |m, x| m.max(x.abs()));
            let tenth = samples.len() / 10;
            let head = peak(&samples[..tenth]);
            let tail = peak(&samples[samples.len() - tenth / 4..]);
            assert!(head > 0.0, "{effect:?} is silent");
            assert!(tail < head / 2.0, "{effect:?} does not fade");
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(Effect::for_event(&GameEvent::Flap), Some(Effect::Flap));
        assert_eq!(
            Effect::for_event(&GameEvent::GameOver {
                score: 0,
                high_score: 0,
                cause: DeathCause::Floor
            }),
            Some(Effect::Death)
        );
        assert_eq!(Effect::for_event(&GameEvent::Started), None);
    }
}
