//! Record output in JSON-based formats.

use serde::Serialize;
use std::io::Write;

/// Error type for serialization operations
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output layout for a stream of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Ndjson,
    /// A single compact JSON array
    JsonArray,
    /// Indented JSON objects separated by blank lines
    Pretty,
}

/// Writes a sequence of serializable records in one [`OutputFormat`].
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a writer. For [`OutputFormat::JsonArray`] the opening bracket is
    /// written immediately.
    pub fn new(mut writer: W, format: OutputFormat) -> Result<Self, SerializationError> {
        if format == OutputFormat::JsonArray {
            write!(writer, "[")?;
        }

        Ok(Self {
            writer,
            format,
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<(), SerializationError> {
        match self.format {
            OutputFormat::Ndjson => {
                serde_json::to_writer(&mut self.writer, record)?;
                writeln!(self.writer)?;
            }
            OutputFormat::JsonArray => {
                if self.written > 0 {
                    write!(self.writer, ",")?;
                }
                serde_json::to_writer(&mut self.writer, record)?;
            }
            OutputFormat::Pretty => {
                if self.written > 0 {
                    writeln!(self.writer)?;
                }
                serde_json::to_writer_pretty(&mut self.writer, record)?;
                writeln!(self.writer)?;
            }
        }

        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the output and flush the underlying writer.
    pub fn finish(mut self) -> Result<W, SerializationError> {
        if self.format == OutputFormat::JsonArray {
            write!(self.writer, "]")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
