//! Labeled feature snapshots serialized as CSV rows.
//!
//! The corpus layout is a header line `label,<feature...>` followed by one
//! row per snapshot, numeric fields fixed to a configured number of decimal
//! places. Column order is [`Feature::ALL`].

use crate::{
    constants::{DEFAULT_DATASET_PRECISION, MAX_DATASET_PRECISION, MIN_DATASET_PRECISION},
    features::{Feature, FeatureVector},
    Error, Result,
};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Smoothed features tagged with a caller-supplied label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSnapshot {
    pub label: String,
    pub features: FeatureVector,
}

/// Header line naming every column
#[must_use]
pub fn header() -> String {
    std::iter::once("label")
        .chain(Feature::ALL.iter().map(|f| f.name()))
        .collect::<Vec<_>>()
        .join(",")
}

/// One CSV row for a snapshot
#[must_use]
pub fn format_row(snapshot: &LabeledSnapshot, precision: usize) -> String {
    let mut row = escape_field(&snapshot.label);
    for value in snapshot.features.to_array() {
        row.push(',');
        row.push_str(&format!("{value:.precision$}"));
    }
    row
}

fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes the header once, then snapshot rows
pub struct DatasetWriter<W: Write> {
    writer: W,
    precision: usize,
    header_written: bool,
    rows: usize,
}

impl<W: Write> DatasetWriter<W> {
    /// Writer for a fresh corpus; the header precedes the first row
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            precision: DEFAULT_DATASET_PRECISION,
            header_written: false,
            rows: 0,
        }
    }

    /// Writer for a corpus that already has its header
    #[must_use]
    pub fn continuing(writer: W) -> Self {
        Self {
            header_written: true,
            ..Self::new(writer)
        }
    }

    /// Set decimal places for numeric fields
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] outside the supported range.
    pub fn with_precision(mut self, precision: usize) -> Result<Self> {
        if !(MIN_DATASET_PRECISION..=MAX_DATASET_PRECISION).contains(&precision) {
            return Err(Error::InvalidInput(format!(
                "Dataset precision must be between {MIN_DATASET_PRECISION} and {MAX_DATASET_PRECISION}, got {precision}"
            )));
        }
        self.precision = precision;
        Ok(self)
    }

    /// Append one snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write(&mut self, snapshot: &LabeledSnapshot) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", header())?;
            self.header_written = true;
        }
        writeln!(self.writer, "{}", format_row(snapshot, self.precision))?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written through this writer
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and return the inner writer
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl DatasetWriter<std::fs::File> {
    /// Open a corpus file for appending, writing the header only when the
    /// file is new or empty
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn append_to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let has_content = file.metadata()?.len() > 0;
        log::info!("Appending dataset rows to {}", path.display());
        Ok(if has_content {
            Self::continuing(file)
        } else {
            Self::new(file)
        })
    }
}
