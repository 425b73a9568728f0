//! Result store
//!
//! One terminal value per retained trajectory, written as one float per line.
//! The file is recreated at the start of every run.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Append-only writer for terminal values
pub struct ResultStore {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl ResultStore {
    /// Create (or truncate) the store at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        log::info!("Writing results to {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn append(&mut self, value: f64) -> Result<()> {
        writeln!(self.writer, "{value}")?;
        self.written += 1;
        Ok(())
    }

    /// Number of values appended so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered values to disk
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

/// Read a result file back into floats, skipping blank lines
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let reader = BufReader::new(File::open(path)?);
    let mut values = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let value = text.parse::<f64>().map_err(|_| SimError::MalformedResult {
            line: index + 1,
            text: text.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Basic statistics of a set of recorded values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl Summary {
    /// `None` for an empty slice
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
        })
    }
}
