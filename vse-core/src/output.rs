//! Output writers for decoded captures.
//!
//! JSON carries the full decoded structure. The two CSV forms are flat views
//! for spreadsheets: the raw samples, or one row per data source.

use crate::types::{DataSourceRecord, DataStreamRecord, ParseResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output writing.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full structure as JSON (default)
    #[default]
    Json,
    /// Raw stream samples as `index,value` rows
    Samples,
    /// One row per data source
    Sources,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputError;

    /// Parses a format name such as "json", "csv" or "sources".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" | "samples" => Ok(Self::Samples),
            "sources" => Ok(Self::Sources),
            other => Err(OutputError::InvalidFormat(format!(
                "Unknown format: {}. Use json, csv or sources",
                other
            ))),
        }
    }
}

impl OutputFormat {
    /// Picks a format from an output file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Samples),
            _ => None,
        }
    }
}

/// JSON writer for a decoded capture.
pub struct JsonWriter<W: Write> {
    writer: BufWriter<W>,
    pretty: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Creates a new JSON writer.
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer: BufWriter::new(writer),
            pretty,
        }
    }

    /// Writes the capture followed by a newline.
    pub fn write(&mut self, result: &ParseResult) -> Result<(), OutputError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, result)?;
        } else {
            serde_json::to_writer(&mut self.writer, result)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV writer for raw stream samples.
pub struct SamplesCsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> SamplesCsvWriter<W> {
    /// Creates a new samples CSV writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes the stream metadata as comment lines, then the column header.
    pub fn write_header(&mut self, stream: &DataStreamRecord) -> Result<(), OutputError> {
        writeln!(
            self.writer,
            "%source:{},timestamp:{},divider:{},unit:{}",
            stream.data_source_handle,
            stream.timestamp,
            stream.sample_rate_divider,
            stream.eng_unit
        )?;
        writeln!(self.writer, "index,value")?;
        Ok(())
    }

    /// Writes all samples of the stream.
    ///
    /// Indices count from the first kept sample, not from the start of the
    /// block.
    pub fn write_samples(&mut self, stream: &DataStreamRecord) -> Result<(), OutputError> {
        for (i, value) in stream.values.iter().enumerate() {
            writeln!(self.writer, "{},{}", i, value)?;
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV writer with one row per data source.
pub struct SourcesCsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> SourcesCsvWriter<W> {
    /// Creates a new data-source CSV writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Writes the column header.
    pub fn write_header(&mut self) -> Result<(), OutputError> {
        writeln!(
            self.writer,
            "handle,parent,name,inputName,unit,deviceName,serialNumber,parameters"
        )?;
        Ok(())
    }

    /// Writes a batch of data sources.
    pub fn write_sources(&mut self, sources: &[DataSourceRecord]) -> Result<(), OutputError> {
        for source in sources {
            let parameters: Vec<String> = source.parameters.iter().map(f32::to_string).collect();
            writeln!(
                self.writer,
                "{},{},{},{},{},{},{},{}",
                source.handle,
                source.parent,
                csv_field(&source.name),
                csv_field(&source.input_name),
                csv_field(&source.unit_string),
                csv_field(&source.device_name),
                csv_field(&source.device_serial_number),
                csv_field(&parameters.join(";")),
            )?;
        }
        Ok(())
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Quotes a text field when it holds a separator, quote or line break.
fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Writes a decoded capture to a JSON file.
pub fn write_json<P: AsRef<Path>>(
    path: P,
    result: &ParseResult,
    pretty: bool,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = JsonWriter::new(file, pretty);
    writer.write(result)?;
    writer.flush()?;
    Ok(())
}

/// Writes the raw stream samples to a CSV file.
///
/// Fails when the capture has no stream.
pub fn write_samples_csv<P: AsRef<Path>>(path: P, result: &ParseResult) -> Result<(), OutputError> {
    let stream = result.raw_data_stream.as_ref().ok_or_else(|| {
        OutputError::InvalidFormat("capture has no raw data stream".to_string())
    })?;
    let file = File::create(path)?;
    let mut writer = SamplesCsvWriter::new(file);
    writer.write_header(stream)?;
    writer.write_samples(stream)?;
    writer.flush()?;
    Ok(())
}

/// Writes one row per data source to a CSV file.
pub fn write_sources_csv<P: AsRef<Path>>(path: P, result: &ParseResult) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = SourcesCsvWriter::new(file);
    writer.write_header()?;
    writer.write_sources(&result.data_sources)?;
    writer.flush()?;
    Ok(())
}
