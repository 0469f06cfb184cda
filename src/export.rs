//! File writers for rendered audio.
//!
//! Both formats are mono 32-bit float: a WAV container (IEEE float) or a bare
//! little-endian sample dump with no header.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use crate::dsp::engine::SampleBuffer;
use crate::error::JshlError;

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// RIFF/WAVE with 32-bit float samples.
    Wav,
    /// Headerless little-endian f32 samples.
    Raw,
}

impl OutputFormat {
    /// Infer the format from a file extension (`.wav`, `.raw`, `.pcm`).
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "wav" => Some(OutputFormat::Wav),
            "raw" | "pcm" => Some(OutputFormat::Raw),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "raw" | "pcm" => Ok(OutputFormat::Raw),
            other => Err(format!("unknown format '{other}' (supported: wav, raw)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Wav => write!(f, "wav"),
            OutputFormat::Raw => write!(f, "raw"),
        }
    }
}

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

/// Encode a buffer as a float WAV file in memory.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>, JshlError> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec(buffer.sample_rate))?;
        for &sample in &buffer.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Write a buffer to `path` as a float WAV file.
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), JshlError> {
    let mut writer = hound::WavWriter::create(path, wav_spec(buffer.sample_rate))?;
    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Samples as consecutive little-endian f32 values.
pub fn encode_raw(buffer: &SampleBuffer) -> Vec<u8> {
    buffer
        .samples
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect()
}

pub fn write_raw(path: &Path, buffer: &SampleBuffer) -> Result<(), JshlError> {
    fs::write(path, encode_raw(buffer))?;
    Ok(())
}

/// Write a buffer to `path` in the given format.
pub fn write(path: &Path, buffer: &SampleBuffer, format: OutputFormat) -> Result<(), JshlError> {
    match format {
        OutputFormat::Wav => write_wav(path, buffer),
        OutputFormat::Raw => write_raw(path, buffer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> SampleBuffer {
        SampleBuffer {
            sample_rate: 48000,
            samples: vec![0.0, 0.5, -0.5, 1.0, -1.0],
        }
    }

    #[test]
    fn wav_header_valid() {
        let wav = encode_wav(&buffer()).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let riff_size = u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]);
        assert_eq!(riff_size as usize, wav.len() - 8);
    }

    #[test]
    fn wav_reads_back_as_float() {
        let wav = encode_wav(&buffer()).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, buffer().samples);
    }

    #[test]
    fn raw_has_no_header() {
        let raw = encode_raw(&buffer());
        assert_eq!(raw.len(), 5 * 4);
        assert_eq!(&raw[4..8], &0.5_f32.to_le_bytes());
    }

    #[test]
    fn writes_files_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let wav_path = dir.path().join("out.wav");
        let raw_path = dir.path().join("out.raw");

        write(&wav_path, &buffer(), OutputFormat::Wav).unwrap();
        write(&raw_path, &buffer(), OutputFormat::Raw).unwrap();

        let reader = hound::WavReader::open(&wav_path).unwrap();
        assert_eq!(reader.len(), 5);
        assert_eq!(fs::read(&raw_path).unwrap(), encode_raw(&buffer()));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.raw");
        let err = write(&path, &buffer(), OutputFormat::Raw).unwrap_err();
        assert!(matches!(err, JshlError::Io(_)));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_extension(Path::new("a.wav")), Some(OutputFormat::Wav));
        assert_eq!(OutputFormat::from_extension(Path::new("a.pcm")), Some(OutputFormat::Raw));
        assert_eq!(OutputFormat::from_extension(Path::new("a.mp3")), None);
        assert_eq!(OutputFormat::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("WAV".parse::<OutputFormat>(), Ok(OutputFormat::Wav));
        assert_eq!("pcm".parse::<OutputFormat>(), Ok(OutputFormat::Raw));
        assert!("flac".parse::<OutputFormat>().is_err());
    }
}
