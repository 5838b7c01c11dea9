use crate::tts::TtsAudio;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "output";

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("refusing to write outside the output directory: {0:?}")]
    InvalidFileName(String),
    #[error("failed to write audio to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory that rendered audio files are written into.
#[derive(Clone, Debug)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure(&self) -> Result<(), OutputError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| OutputError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    /// Writes `audio` as `file_name` and returns the full path.
    pub async fn write(&self, file_name: &str, audio: &TtsAudio) -> Result<PathBuf, OutputError> {
        if !is_plain_file_name(file_name) {
            return Err(OutputError::InvalidFileName(file_name.to_owned()));
        }
        self.ensure().await?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &audio.bytes)
            .await
            .map_err(|source| OutputError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            target: LOG_TARGET,
            path = %path.display(),
            bytes = audio.bytes.len(),
            "audio saved"
        );
        Ok(path)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::AudioFormat;
    use bytes::Bytes;

    fn audio() -> TtsAudio {
        TtsAudio {
            format: AudioFormat::Mp3,
            bytes: Bytes::from_static(b"ID3fake"),
            sample_rate_hz: None,
            channels: None,
        }
    }

    #[tokio::test]
    async fn creates_directory_and_writes_bytes() {
        let root = tempfile::tempdir().unwrap();
        let store = OutputStore::new(root.path().join("static").join("output"));

        let path = store.write("output_joy_high_1.mp3", &audio()).await.unwrap();

        assert_eq!(path, store.dir().join("output_joy_high_1.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"ID3fake");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let store = OutputStore::new(root.path());
        std::fs::write(root.path().join("a.mp3"), b"old").unwrap();

        store.write("a.mp3", &audio()).await.unwrap();
        assert_eq!(std::fs::read(root.path().join("a.mp3")).unwrap(), b"ID3fake");
    }

    #[tokio::test]
    async fn rejects_names_that_escape_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let store = OutputStore::new(root.path());

        for name in ["../evil.mp3", "nested/a.mp3", "a\\b.wav", "", "."] {
            let err = store.write(name, &audio()).await.unwrap_err();
            assert!(matches!(err, OutputError::InvalidFileName(_)), "{name:?}");
        }
    }
}
