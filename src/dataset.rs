//! Per-tick dataset rows
//!
//! One row per decided tick: the feature vector of the state the decision was
//! made on, an optional look-ahead future score, then the direction that was
//! applied. Rows are appended; the header is written only when the file is
//! created.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::features::{AttributeKind, FeatureSchema, FeatureVector};
use crate::game::{Direction, GameState};

const RELATION: &str = "snake_game";
const FUTURE_SCORE: &str = "future_score";
const DIRECTION: &str = "direction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// Comma separated, header row, booleans as 1/0
    #[default]
    Csv,
    /// Weka ARFF, booleans as True/False
    Arff,
}

pub struct DatasetWriter {
    path: PathBuf,
    format: DatasetFormat,
    schema: FeatureSchema,
    include_future_score: bool,
    out: BufWriter<File>,
    rows: u64,
}

impl DatasetWriter {
    /// Open `path` for appending, writing the header if the file is new
    pub fn open(
        path: &Path,
        format: DatasetFormat,
        schema: FeatureSchema,
        include_future_score: bool,
    ) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let is_new = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open dataset {:?}", path))?;

        let mut writer = Self {
            path: path.to_path_buf(),
            format,
            schema,
            include_future_score,
            out: BufWriter::new(file),
            rows: 0,
        };

        if is_new {
            writer.write_header()?;
            tracing::info!(path = ?writer.path, format = ?format, schema = schema.name(), "created dataset");
        } else {
            tracing::info!(path = ?writer.path, "appending to existing dataset");
        }

        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written by this writer
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Whether rows carry a look-ahead future score
    pub fn includes_future_score(&self) -> bool {
        self.include_future_score
    }

    fn write_header(&mut self) -> Result<()> {
        let attributes = self.schema.attributes();
        match self.format {
            DatasetFormat::Csv => {
                let mut columns: Vec<&str> = attributes.iter().map(|a| a.name).collect();
                if self.include_future_score {
                    columns.push(FUTURE_SCORE);
                }
                columns.push(DIRECTION);
                writeln!(self.out, "{}", columns.join(","))?;
            }
            DatasetFormat::Arff => {
                writeln!(self.out, "@RELATION {RELATION}")?;
                writeln!(self.out)?;
                for attr in &attributes {
                    let kind = match attr.kind {
                        AttributeKind::Numeric => "NUMERIC",
                        AttributeKind::Boolean => "{True, False}",
                    };
                    writeln!(self.out, "@ATTRIBUTE {} {}", attr.name, kind)?;
                }
                if self.include_future_score {
                    writeln!(self.out, "@ATTRIBUTE {FUTURE_SCORE} NUMERIC")?;
                }
                writeln!(self.out, "@ATTRIBUTE {DIRECTION} {{LEFT, RIGHT, UP, DOWN}}")?;
                writeln!(self.out)?;
                writeln!(self.out, "@DATA")?;
            }
        }
        Ok(())
    }

    /// Append one row for `state` and the direction applied to it.
    ///
    /// `future_score` is ignored unless the writer was opened with it.
    pub fn record(&mut self, state: &GameState, direction: Direction, future_score: i32) -> Result<()> {
        let features = FeatureVector::build(state, self.schema);
        let line = self.format_row(&features, direction, future_score);
        writeln!(self.out, "{line}")
            .with_context(|| format!("Failed to append to dataset {:?}", self.path))?;
        self.rows += 1;
        Ok(())
    }

    fn format_row(&self, features: &FeatureVector, direction: Direction, future_score: i32) -> String {
        let mut fields: Vec<String> = self
            .schema
            .attributes()
            .iter()
            .zip(features.values())
            .map(|(attr, &value)| match (attr.kind, self.format) {
                (AttributeKind::Boolean, DatasetFormat::Arff) => {
                    if value != 0.0 { "True" } else { "False" }.to_string()
                }
                (AttributeKind::Boolean, DatasetFormat::Csv) => {
                    if value != 0.0 { "1" } else { "0" }.to_string()
                }
                (AttributeKind::Numeric, _) => value.to_string(),
            })
            .collect();

        if self.include_future_score {
            fields.push(future_score.to_string());
        }
        fields.push(match self.format {
            DatasetFormat::Csv => direction.label().to_string(),
            DatasetFormat::Arff => format!("\"{}\"", direction.label()),
        });
        fields.join(",")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Failed to flush dataset {:?}", self.path))
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!(path = ?self.path, "failed to flush dataset on close: {e}");
        }
    }
}
