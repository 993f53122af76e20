//! Snapshot files of the CG iterates
//!
//! A snapshot named `<prefix><iteration:03>.txt` holds three blocks of
//! space-separated values: the bottom boundary row, the interior solution
//! reshaped into rows of width `m`, and the top boundary row.

use crate::error::{HeatError, Result};
use ndarray::{Array1, Array2};
use solvers::SnapshotSink;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Path of the snapshot for `iteration`: prefix followed by a 3-digit counter
pub fn snapshot_path(prefix: &Path, iteration: usize) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("{iteration:03}.txt"));
    PathBuf::from(name)
}

/// Write one snapshot: bottom row, interior rows of width `m`, top row
pub fn write_field<W: Write>(
    out: &mut W,
    x: &Array1<f64>,
    m: usize,
    bottom: &Array1<f64>,
    top: &Array1<f64>,
) -> io::Result<()> {
    write_row(out, bottom.iter())?;
    for (k, value) in x.iter().enumerate() {
        if k > 0 && k % m == 0 {
            writeln!(out)?;
        }
        write!(out, "{value} ")?;
    }
    writeln!(out)?;
    write_row(out, top.iter())
}

fn write_row<'a, W: Write>(out: &mut W, values: impl Iterator<Item = &'a f64>) -> io::Result<()> {
    for value in values {
        write!(out, "{value} ")?;
    }
    writeln!(out)
}

/// [`SnapshotSink`] that writes each iterate to its own file
#[derive(Debug)]
pub struct SnapshotWriter {
    prefix: PathBuf,
    m: usize,
    bottom: Array1<f64>,
    top: Array1<f64>,
    written: Vec<PathBuf>,
}

impl SnapshotWriter {
    pub fn new(prefix: impl AsRef<Path>, m: usize, bottom: Array1<f64>, top: Array1<f64>) -> Self {
        Self {
            prefix: prefix.as_ref().to_path_buf(),
            m,
            bottom,
            top,
            written: Vec::new(),
        }
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl SnapshotSink<f64> for SnapshotWriter {
    fn record(&mut self, iteration: usize, x: &Array1<f64>) -> io::Result<()> {
        let path = snapshot_path(&self.prefix, iteration);
        let mut out = BufWriter::new(File::create(&path)?);
        write_field(&mut out, x, self.m, &self.bottom, &self.top)?;
        out.flush()?;

        log::debug!("wrote snapshot {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Parse a snapshot back into a dense field, one matrix row per text line
///
/// Blank lines are skipped. Every row must have the same number of values.
pub fn read_field<R: BufRead>(reader: R) -> Result<Array2<f64>> {
    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| HeatError::MalformedSnapshot {
            line: line_no,
            message: e.to_string(),
        })?;

        let start = values.len();
        for token in line.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|_| HeatError::MalformedSnapshot {
                    line: line_no,
                    message: format!("not a number: {token:?}"),
                })?;
            values.push(value);
        }

        let count = values.len() - start;
        if count == 0 {
            continue;
        }
        match width {
            None => width = Some(count),
            Some(w) if w != count => {
                return Err(HeatError::MalformedSnapshot {
                    line: line_no,
                    message: format!("expected {w} values, found {count}"),
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = width.unwrap_or(0);
    Array2::from_shape_vec((rows, cols), values).map_err(|e| HeatError::MalformedSnapshot {
        line: rows,
        message: e.to_string(),
    })
}

/// Read a snapshot file written by [`SnapshotWriter`]
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HeatError::io(path, e))?;
    read_field(BufReader::new(file))
}
