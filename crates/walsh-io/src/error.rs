//! Error types for file I/O and presets.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing audio files and presets.
#[derive(Debug, Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a preset file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a preset file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A preset or command line named a parameter that does not exist.
    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    /// Channel data does not match the declared channel count.
    #[error("channel count mismatch: expected {expected}, found {found}")]
    ChannelMismatch {
        /// Channels declared by the spec.
        expected: usize,
        /// Channels actually supplied.
        found: usize,
    },

    /// Channels of one buffer have different lengths.
    #[error("channel {channel} has {found} frames, expected {expected}")]
    RaggedChannels {
        /// Offending channel index.
        channel: usize,
        /// Frames in channel 0.
        expected: usize,
        /// Frames in the offending channel.
        found: usize,
    },

    /// Bit depth hound cannot write for the requested format.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

impl Error {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::WriteFile {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = Error::read_file("/a/b.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/b.toml"), "got: {msg}");
        assert!(err.source().is_some(), "ReadFile must expose I/O source");
    }

    #[test]
    fn write_file_display() {
        let err = Error::write_file("/a/b.toml", mock_io_err());
        assert!(err.to_string().contains("failed to write file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_param_display() {
        let err = Error::UnknownParam("drive".to_string());
        assert_eq!(err.to_string(), "unknown parameter: drive");
    }

    #[test]
    fn channel_mismatch_display() {
        let err = Error::ChannelMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "channel count mismatch: expected 2, found 3"
        );
    }

    #[test]
    fn ragged_channels_display() {
        let err = Error::RaggedChannels {
            channel: 1,
            expected: 10,
            found: 9,
        };
        assert_eq!(err.to_string(), "channel 1 has 9 frames, expected 10");
    }

    #[test]
    fn toml_parse_converts() {
        let de = toml::from_str::<toml::Table>("= nope").unwrap_err();
        let err: Error = de.into();
        assert!(matches!(err, Error::TomlParse(_)));
        assert!(err.to_string().starts_with("failed to parse TOML"));
    }
}
