//! Document sources and sinks
//!
//! The model never touches the filesystem itself. Front-ends hand it a
//! source to read from or a sink to write to. A source that cannot produce
//! anything (cancelled pick, unreadable file) answers `None`.

use std::path::{Path, PathBuf};

/// Provides configuration text
pub trait ConfigSource {
    /// Obtain the document text, or `None` if nothing was obtained
    fn obtain(&mut self) -> Option<String>;
}

/// Persists serialized configuration text
pub trait ConfigSink {
    fn persist(&mut self, text: &str) -> std::io::Result<()>;
}

/// Provides raw bytes of certificate or key material
pub trait MaterialSource {
    fn obtain_bytes(&mut self) -> Option<Vec<u8>>;
}

/// An in-memory source; `None` behaves like a cancelled pick
impl ConfigSource for Option<String> {
    fn obtain(&mut self) -> Option<String> {
        self.take()
    }
}

/// An in-memory sink that keeps the last persisted text
impl ConfigSink for String {
    fn persist(&mut self, text: &str) -> std::io::Result<()> {
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

impl MaterialSource for Option<Vec<u8>> {
    fn obtain_bytes(&mut self) -> Option<Vec<u8>> {
        self.take()
    }
}

/// Reads a configuration file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for FileSource {
    fn obtain(&mut self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                tracing::info!("📂 Read configuration from {:?}", self.path);
                Some(text)
            }
            Err(e) => {
                tracing::warn!("⚠️ Cannot read configuration {:?}: {}", self.path, e);
                None
            }
        }
    }
}

/// Writes a configuration file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSink for FileSink {
    fn persist(&mut self, text: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, text)?;
        tracing::info!("💾 Wrote configuration to {:?}", self.path);
        Ok(())
    }
}

/// Reads certificate or key material from a file
#[derive(Debug, Clone)]
pub struct MaterialFile {
    path: PathBuf,
}

impl MaterialFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MaterialSource for MaterialFile {
    fn obtain_bytes(&mut self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("⚠️ Cannot read material {:?}: {}", self.path, e);
                None
            }
        }
    }
}
