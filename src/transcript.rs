use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Append-only record of every request envelope sent during the current round.
#[derive(Debug)]
pub struct Transcript {
    path: PathBuf,
    file: File,
}

impl Transcript {
    /// Opens (and empties) the transcript at `path`.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Transcript> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("could not create transcript '{}'", path.display()))?;
        Ok(Transcript { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drops everything recorded so far.
    pub fn truncate(&mut self) -> anyhow::Result<()> {
        self.file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("could not truncate transcript '{}'", self.path.display()))?;
        Ok(())
    }

    pub fn append(&mut self, envelope: &str) -> anyhow::Result<()> {
        writeln!(self.file, "{envelope}").context("could not write transcript")?;
        Ok(())
    }
}
