//! Puzzle inputs read from the local filesystem

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read-only view of an input directory
///
/// Directory structure: `{base_dir}/{year}/day{day:02}.txt`. A single
/// year/day may be redirected to an explicit file.
pub struct InputStore {
    base_dir: PathBuf,
    override_file: Option<(u16, u8, PathBuf)>,
}

impl InputStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            override_file: None,
        }
    }

    /// Serve `path` for `year`/`day` instead of the directory layout
    pub fn with_override(mut self, year: u16, day: u8, path: PathBuf) -> Self {
        self.override_file = Some((year, day, path));
        self
    }

    /// Where the input for a specific year/day is looked up
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        match &self.override_file {
            Some((y, d, path)) if *y == year && *d == day => path.clone(),
            _ => self
                .base_dir
                .join(year.to_string())
                .join(format!("day{:02}.txt", day)),
        }
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.input_path(year, day).is_file()
    }

    pub fn get(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.input_path(year, day);
        read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => InputError::Missing { year, day, path },
            _ => InputError::Read { path, source },
        })
    }
}

fn read(path: &Path) -> std::io::Result<String> {
    let content = fs::read_to_string(path)?;
    tracing::trace!(path = %path.display(), bytes = content.len(), "read input");
    Ok(content)
}
