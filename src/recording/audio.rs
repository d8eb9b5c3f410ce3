//! Microphone capture and in-memory WAV encoding.
//!
//! This module handles audio input device management and PCM sample capture.
//! Audio is captured from the configured input device, converted to mono, and
//! encoded as a WAV buffer that is handed to transcription without touching
//! disk.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::WavWriter;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// One recorded answer, encoded and ready for transcription.
///
/// Ownership of the buffer transfers to the caller when capture stops; the
/// recorder keeps nothing.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// WAV-encoded mono PCM audio
    pub wav: Vec<u8>,
    /// Sample rate the clip was captured at
    pub sample_rate: u32,
    /// Captured duration in seconds
    pub duration_secs: f32,
}

/// Captures audio from a specified or default input device.
///
/// Captures at the device's native sample rate, converting multi-channel
/// input to mono by averaging channels. Samples accumulate in capture order
/// until the stream is stopped.
pub struct AudioRecorder {
    /// Rate the device actually captures at
    sample_rate: u32,
    /// Accumulated mono i16 PCM samples
    samples: Arc<Mutex<Vec<i16>>>,
    /// Live input stream; dropping it releases the device
    stream: Option<cpal::Stream>,
    /// Configured device name, or "default"
    device_name: String,
}

impl AudioRecorder {
    /// Creates a new audio recorder with requested sample rate and device.
    ///
    /// Note: The actual recording sample rate may differ based on device
    /// capabilities; `sample_rate()` reports the real rate once capture runs.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            device_name,
        }
    }

    /// Starts capturing from the configured input device.
    ///
    /// # Errors
    /// - If no input device is available or the specified device is not found
    /// - If device configuration fails
    /// - If audio stream creation fails
    pub fn start_capture(&mut self) -> Result<()> {
        let device = with_alsa_silenced(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Device '{device_name}' captures at {device_sample_rate}Hz, not the requested {}Hz",
                self.sample_rate
            );
        }

        tracing::info!(
            "Capturing from '{device_name}' at {device_sample_rate}Hz, {num_channels} channel(s)"
        );

        self.sample_rate = device_sample_rate;

        let samples_arc = Arc::clone(&self.samples);

        let stream = device.build_input_stream(
            &device_config.into(),
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let mut samples = samples_arc.lock().unwrap();
                mix_into_mono(data, num_channels, &mut samples);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stops capturing and returns the recorded clip.
    ///
    /// Dropping the stream releases the input device immediately. All chunks
    /// captured between start and stop are encoded in capture order.
    ///
    /// # Errors
    /// - If WAV encoding fails
    pub fn stop_capture(&mut self) -> Result<AudioClip> {
        // Stop the audio stream and release the device
        self.stream = None;

        let samples = std::mem::take(&mut *self.samples.lock().unwrap());
        let duration_secs = samples.len() as f32 / self.sample_rate as f32;

        if samples.is_empty() {
            tracing::warn!("Capture ended with no samples; uploading an empty clip");
        } else {
            tracing::debug!(
                "Captured {} samples at {}Hz ({duration_secs:.2}s)",
                samples.len(),
                self.sample_rate
            );
        }

        let wav = encode_wav(&samples, self.sample_rate)?;

        Ok(AudioClip {
            wav,
            sample_rate: self.sample_rate,
            duration_secs,
        })
    }

    /// Returns a handle to the sample buffer for level monitoring.
    pub fn samples_handle(&self) -> Arc<Mutex<Vec<i16>>> {
        Arc::clone(&self.samples)
    }

    /// Returns the actual sample rate of the recording.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Appends incoming device frames to the mono sample buffer.
///
/// Multi-channel input is averaged into a single channel per frame.
fn mix_into_mono(data: &[i16], num_channels: usize, samples: &mut Vec<i16>) {
    match num_channels {
        1 => {
            samples.extend_from_slice(data);
        }
        2 => {
            for frame in data.chunks_exact(2) {
                let left = frame[0] as i32;
                let right = frame[1] as i32;
                samples.push(((left + right) / 2) as i16);
            }
        }
        _ => {
            for frame in data.chunks_exact(num_channels) {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                samples.push((sum / num_channels as i32) as i16);
            }
        }
    }
}

/// Encodes mono i16 samples as an in-memory WAV buffer.
fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let wav_spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), wav_spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    tracing::debug!("Encoded WAV clip: {} bytes", buffer.len());
    Ok(buffer)
}

/// Computes the current input level as a 0-100 percentage.
///
/// Converts the RMS of roughly the last 100ms of samples to dBFS and
/// normalizes against a -20 dBFS reference over a 40 dB window. Feeds the
/// cosmetic level meter only; recording correctness does not depend on it.
pub fn recent_level(samples: &[i16], sample_rate: u32) -> u8 {
    if samples.is_empty() {
        return 0;
    }

    let window = std::cmp::min((sample_rate / 10) as usize, samples.len());
    let recent = &samples[samples.len() - window..];

    let sum_of_squares: i64 = recent.iter().map(|&x| (x as i64).pow(2)).sum();
    let mean_square = sum_of_squares / recent.len() as i64;
    let rms = (mean_square as f32).sqrt();

    let db_fs = if rms > 0.0 {
        20.0 * (rms / 32767.0).log10()
    } else {
        -160.0
    };

    const REFERENCE_LEVEL_DB: f32 = -20.0;
    let min_db = REFERENCE_LEVEL_DB - 40.0;
    ((db_fs - min_db) / 40.0 * 100.0).clamp(0.0, 100.0) as u8
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    let devices: Vec<cpal::Device> = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
        .collect();

    // A numeric spec selects by position in the enumeration order.
    if let Ok(index) = device_spec.parse::<usize>() {
        let count = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                count.saturating_sub(1)
            )
        });
    }

    devices
        .into_iter()
        .find(|device| device.name().is_ok_and(|name| name == device_spec))
        .ok_or_else(|| {
            anyhow!(
                "Audio input device '{device_spec}' not found. Use 'intervu list-devices' to see available devices."
            )
        })
}

/// Runs `f` with stderr pointed at /dev/null, so ALSA's library chatter on
/// Linux does not end up on the terminal. Everything cpal does against the
/// device list should go through here.
#[cfg(target_os = "linux")]
pub(crate) fn with_alsa_silenced<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let saved_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    if unsafe { libc::dup2(dev_null.as_raw_fd(), libc::STDERR_FILENO) } == -1 {
        unsafe { libc::close(saved_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(saved_stderr, libc::STDERR_FILENO);
        libc::close(saved_stderr);
    }

    result
}

/// ALSA only exists on Linux; elsewhere this is a pass-through.
#[cfg(not(target_os = "linux"))]
pub(crate) fn with_alsa_silenced<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_into_mono_passthrough() {
        let mut samples = Vec::new();
        mix_into_mono(&[1, 2, 3], 1, &mut samples);
        assert_eq!(samples, vec![1, 2, 3]);
    }

    #[test]
    fn test_mix_into_mono_averages_stereo() {
        let mut samples = Vec::new();
        mix_into_mono(&[100, 200, -50, 50], 2, &mut samples);
        assert_eq!(samples, vec![150, 0]);
    }

    #[test]
    fn test_mix_into_mono_preserves_capture_order() {
        let mut samples = vec![7];
        mix_into_mono(&[8, 8], 2, &mut samples);
        mix_into_mono(&[9], 1, &mut samples);
        assert_eq!(samples, vec![7, 8, 9]);
    }

    #[test]
    fn test_encode_wav_produces_riff_header() {
        let wav = encode_wav(&[0, 1000, -1000, 0], 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus 2 bytes per sample
        assert_eq!(wav.len(), 44 + 8);
    }

    #[test]
    fn test_recent_level_bounds() {
        assert_eq!(recent_level(&[], 16000), 0);
        assert_eq!(recent_level(&[0; 1600], 16000), 0);

        let loud = vec![i16::MAX; 1600];
        assert_eq!(recent_level(&loud, 16000), 100);
    }
}
