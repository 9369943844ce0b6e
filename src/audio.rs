//! Synthesized sound: a looping background tune started once at launch,
//! plus jump and death effects. All cosmetic; only opening the output
//! device can fail, and that is fatal at startup.

use anyhow::{Context, Result};
use fundsp::prelude::*;
use rodio::{self, OutputStream, OutputStreamBuilder, Sink, mixer::Mixer};
use std::time::Duration;

pub struct Audio {
    stream: OutputStream,
}

impl Audio {
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("opening audio output device")?;
        Ok(Self { stream })
    }

    fn mixer(&self) -> &Mixer {
        self.stream.mixer()
    }

    /// Eight-note loop, repeated for the lifetime of the process.
    pub fn start_music(&self) {
        let sink = Sink::connect_new(self.mixer());

        const NOTES: [f64; 8] = [262.0, 330.0, 392.0, 523.0, 392.0, 440.0, 330.0, 294.0];
        const NOTE_LEN: f64 = 0.4;

        let freq = lfo(|t: f64| NOTES[((t / NOTE_LEN) as usize) % NOTES.len()]);
        // Soft per-note decay so the loop does not drone.
        let gain = lfo(|t: f64| {
            let phase = (t / NOTE_LEN).fract();
            0.05 * (1.0 - phase * phase)
        });
        let sound = freq >> triangle() >> mul(gain);

        let source = rodio::source::from_iter(sound.take(44100 * 3.2))
            .convert_samples::<f32>()
            .periodic_samples(Duration::from_secs_f32(1.0 / 44100.0), 1)
            .repeat_infinite();
        sink.append(source);
        sink.detach();
    }

    /// Short rising blip when a jump is taken.
    pub fn jump(&self) {
        let sink = Sink::connect_new(self.mixer());

        let freq = lfo(|t: f64| lerp11(320.0, 720.0, (t / 0.1).min(1.0)));
        let gain = lfo(|t: f64| lerp11(0.1, 0.0, (t / 0.15).min(1.0)));
        let sound = freq >> square() >> mul(gain);

        let source = rodio::source::from_iter(sound.take(44100 * 0.15))
            .convert_samples::<f32>()
            .periodic_samples(Duration::from_secs_f32(1.0 / 44100.0), 1);
        sink.append(source);
        sink.detach();
    }

    /// Falling sawtooth sweep on collision.
    pub fn death(&self) {
        let sink = Sink::connect_new(self.mixer());

        let freq = lfo(|t: f64| lerp11(400.0, 80.0, (t / 0.4).min(1.0)));
        let gain = lfo(|t: f64| lerp11(0.15, 0.0, (t / 0.5).min(1.0)));
        let sound = freq >> saw() >> mul(gain);

        let source = rodio::source::from_iter(sound.take(44100 * 0.5))
            .convert_samples::<f32>()
            .periodic_samples(Duration::from_secs_f32(1.0 / 44100.0), 1);
        sink.append(source);
        sink.detach();
    }
}
