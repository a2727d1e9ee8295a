//! Phase-end chime: a short sine tone with a fast attack and an exponential
//! decay, played on the default output device.

use std::time::Duration;

/// A single enveloped sine tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Gain reached at the end of the attack.
    pub peak: f32,
    /// Gain the decay ends on.
    pub floor: f32,
    pub attack: Duration,
    pub length: Duration,
}

impl Tone {
    /// 800 Hz, ramping to 0.2 over 100 ms and decaying to 0.01 by 500 ms.
    pub const NOTIFICATION: Tone = Tone {
        frequency: 800.0,
        peak: 0.2,
        floor: 0.01,
        attack: Duration::from_millis(100),
        length: Duration::from_millis(500),
    };

    /// Envelope gain `t` seconds after the tone starts.
    pub fn gain(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        let length = self.length.as_secs_f32();
        if !(0.0..length).contains(&t) {
            0.0
        } else if t < attack {
            self.peak * t / attack
        } else {
            let progress = (t - attack) / (length - attack);
            self.peak * (self.floor / self.peak).powf(progress)
        }
    }

    /// Mono samples for the whole tone at `sample_rate`.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let count = (self.length.as_secs_f32() * rate).round() as usize;
        (0..count)
            .map(|n| {
                let t = n as f32 / rate;
                self.gain(t) * (std::f32::consts::TAU * self.frequency * t).sin()
            })
            .collect()
    }
}

#[cfg(feature = "audio")]
pub use playback::play;

#[cfg(feature = "audio")]
mod playback {
    use std::sync::mpsc;
    use std::thread;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use pomotick_core::NotifyError;
    use tracing::warn;

    use super::Tone;

    fn unavailable(err: impl std::fmt::Display) -> NotifyError {
        NotifyError::AudioUnavailable(err.to_string())
    }

    fn start(tone: Tone) -> Result<cpal::Stream, NotifyError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| unavailable("no default output device"))?;
        let config = device.default_output_config().map_err(unavailable)?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(unavailable(format!(
                "unsupported output sample format: {:?}",
                config.sample_format()
            )));
        }

        let channels = usize::from(config.channels()).max(1);
        let samples = tone.samples(config.sample_rate());
        let mut cursor = 0usize;
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    for frame in data.chunks_mut(channels) {
                        frame.fill(samples.get(cursor).copied().unwrap_or(0.0));
                        cursor += 1;
                    }
                },
                |err| warn!(error = %err, "chime stream error"),
                None,
            )
            .map_err(unavailable)?;
        stream.play().map_err(unavailable)?;
        Ok(stream)
    }

    /// Play `tone` without blocking the caller.
    ///
    /// The stream lives on its own thread for the length of the tone. Errors
    /// opening the device are returned before the tone starts.
    pub fn play(tone: Tone) -> Result<(), NotifyError> {
        let (started_tx, started_rx) = mpsc::channel();
        thread::Builder::new()
            .name("pomotick-chime".into())
            .spawn(move || match start(tone) {
                Ok(stream) => {
                    let _ = started_tx.send(Ok(()));
                    thread::sleep(tone.length);
                    drop(stream);
                }
                Err(e) => {
                    let _ = started_tx.send(Err(e));
                }
            })
            .map_err(unavailable)?;
        started_rx
            .recv()
            .map_err(|_| unavailable("chime thread exited"))?
    }
}
