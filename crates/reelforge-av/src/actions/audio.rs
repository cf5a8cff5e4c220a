//! Audio track extraction.

use crate::tools::Toolchain;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default bitrate for lossy formats.
pub const DEFAULT_BITRATE: &str = "192k";

/// Output audio formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 via libmp3lame
    #[default]
    Mp3,
    /// 16-bit PCM, 44.1 kHz stereo
    Wav,
    /// AAC in an ADTS stream
    Aac,
    /// AAC in an MP4 audio container
    M4a,
    /// Vorbis in Ogg
    Ogg,
    /// FLAC (lossless)
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Aac,
        AudioFormat::M4a,
        AudioFormat::Ogg,
        AudioFormat::Flac,
    ];

    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Aac => "aac",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
        }
    }

    /// Get the ffmpeg codec name.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Wav => "pcm_s16le",
            AudioFormat::Aac | AudioFormat::M4a => "aac",
            AudioFormat::Ogg => "libvorbis",
            AudioFormat::Flac => "flac",
        }
    }

    /// Whether a bitrate applies.
    pub fn is_lossy(&self) -> bool {
        !matches!(self, AudioFormat::Wav | AudioFormat::Flac)
    }

    /// Encoder arguments following `-vn`.
    pub fn codec_args(&self, bitrate: &str) -> Vec<String> {
        let mut args = vec!["-acodec".to_string(), self.ffmpeg_codec().to_string()];
        match self {
            AudioFormat::Wav => {
                args.extend(["-ar", "44100", "-ac", "2"].map(String::from));
            }
            AudioFormat::Flac => {}
            _ => {
                args.push("-b:a".to_string());
                args.push(bitrate.to_string());
            }
        }
        args
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AudioFormat::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Unsupported(format!("audio format '{}'", s)))
    }
}

/// Check a bitrate such as `192k`, `320K` or `128000`.
pub fn validate_bitrate(bitrate: &str) -> Result<()> {
    let digits = bitrate
        .strip_suffix(['k', 'K', 'm', 'M'])
        .unwrap_or(bitrate);
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(Error::InvalidInput(format!("invalid bitrate '{}'", bitrate))),
    }
}

/// Extract the audio of `input` into `output`, returning the output size in
/// bytes.
pub fn extract_audio(
    tools: &Toolchain,
    input: &Path,
    output: &Path,
    format: AudioFormat,
    bitrate: &str,
) -> Result<u64> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }
    if format.is_lossy() {
        validate_bitrate(bitrate)?;
    }

    let mut cmd = tools.ffmpeg();
    cmd.arg("-i")
        .path_arg(input)
        .arg("-vn")
        .args(format.codec_args(bitrate))
        .path_arg(output);

    tracing::debug!("Extracting {} audio from {:?}", format, input);
    cmd.execute()?;

    Ok(std::fs::metadata(output)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_args() {
        assert_eq!(
            AudioFormat::Mp3.codec_args("192k"),
            ["-acodec", "libmp3lame", "-b:a", "192k"]
        );
        assert_eq!(
            AudioFormat::Wav.codec_args("192k"),
            ["-acodec", "pcm_s16le", "-ar", "44100", "-ac", "2"]
        );
        assert_eq!(
            AudioFormat::M4a.codec_args("256k"),
            ["-acodec", "aac", "-b:a", "256k"]
        );
        assert_eq!(
            AudioFormat::Ogg.codec_args("128k"),
            ["-acodec", "libvorbis", "-b:a", "128k"]
        );
        assert_eq!(AudioFormat::Flac.codec_args("192k"), ["-acodec", "flac"]);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("MP3".parse::<AudioFormat>().unwrap(), AudioFormat::Mp3);
        assert_eq!("flac".parse::<AudioFormat>().unwrap(), AudioFormat::Flac);
        assert!("wma".parse::<AudioFormat>().is_err());
        for f in AudioFormat::ALL {
            assert_eq!(f.to_string().parse::<AudioFormat>().unwrap(), f);
        }
    }

    #[test]
    fn test_validate_bitrate() {
        assert!(validate_bitrate("192k").is_ok());
        assert!(validate_bitrate("320K").is_ok());
        assert!(validate_bitrate("128000").is_ok());
        assert!(validate_bitrate("0k").is_err());
        assert!(validate_bitrate("loud").is_err());
        assert!(validate_bitrate("").is_err());
    }

    #[test]
    fn test_lossless_formats() {
        assert!(!AudioFormat::Wav.is_lossy());
        assert!(!AudioFormat::Flac.is_lossy());
        assert!(AudioFormat::Aac.is_lossy());
    }
}
