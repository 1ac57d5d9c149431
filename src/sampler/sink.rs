//! Destinations for serialized sample trees.

use log::debug;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Opens a byte destination for a generated file name.
///
/// Invoked once per successful `Sampler::stop`, on the caller's thread.
pub trait SinkFactory: Send + Sync {
    fn create(&self, name: &str) -> io::Result<Box<dyn Write>>;
}

impl<F> SinkFactory for F
where
    F: Fn(&str) -> io::Result<Box<dyn Write>> + Send + Sync,
{
    fn create(&self, name: &str) -> io::Result<Box<dyn Write>> {
        self(name)
    }
}

/// Writes each sample file into a directory, creating it when missing
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SinkFactory for DirectorySink {
    fn create(&self, name: &str) -> io::Result<Box<dyn Write>> {
        if !self.dir.exists() {
            debug!("Creating sample directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
        }

        let file = File::create(self.dir.join(name))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
