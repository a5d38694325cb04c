//! Multichannel WAV reading and writing.

use anyhow::{Context, bail};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file as one `Vec<f32>` per channel.
pub fn read_wav_channels(path: &Path) -> anyhow::Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels);
    if channels == 0 {
        bail!("{} has no channels", path.display());
    }

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((out, spec))
}

/// Write one slice per channel as an interleaved WAV file.
///
/// 32-bit output is IEEE float; 16 and 24 bit are clamped PCM.
pub fn write_wav_channels(path: &Path, channels: &[Vec<f32>], spec: WavSpec) -> anyhow::Result<()> {
    if channels.len() != usize::from(spec.channels) {
        bail!(
            "spec has {} channels but {} were supplied",
            spec.channels,
            channels.len()
        );
    }
    if !matches!(spec.bits_per_sample, 16 | 24 | 32) {
        bail!("unsupported bit depth: {}", spec.bits_per_sample);
    }

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))
        .with_context(|| format!("failed to create {}", path.display()))?;

    if spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for i in 0..frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stereo_round_trip_float() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("st.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        };
        let left: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let right: Vec<f32> = left.iter().map(|x| -x).collect();

        write_wav_channels(&path, &[left.clone(), right.clone()], spec).unwrap();
        let (channels, read_spec) = read_wav_channels(&path).unwrap();
        assert_eq!(read_spec, spec);
        assert_eq!(channels, vec![left, right]);
    }

    #[test]
    fn test_pcm_16_quantizes_and_clamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pcm.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
        };
        write_wav_channels(&path, &[vec![0.5, -0.25, 2.0, -2.0]], spec).unwrap();

        let (channels, _) = read_wav_channels(&path).unwrap();
        let mono = &channels[0];
        assert!((mono[0] - 0.5).abs() < 1e-4);
        assert!((mono[1] + 0.25).abs() < 1e-4);
        assert!(mono[2] < 1.0 && mono[2] > 0.999);
        assert_eq!(mono[3], -1.0);
    }

    #[test]
    fn test_channel_count_mismatch() {
        let dir = TempDir::new().unwrap();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 24,
        };
        assert!(write_wav_channels(&dir.path().join("x.wav"), &[vec![0.0]], spec).is_err());
    }
}
