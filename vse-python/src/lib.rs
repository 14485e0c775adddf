//! Python bindings for the VSE004 decoder.
//!
//! Decoded captures come back as plain dicts using the same keys as the JSON
//! output, except that the raw stream samples are exposed through a
//! [`Samples`] object with numpy access.

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::path::PathBuf;
use vse_core::{
    DataSourceRecord, DataStreamRecord, DecodeError, DecoderOptions, DevData, ParseResult,
    PrimaryHeader, SecondaryHeader, VseDecoder, DEFAULT_TOLERANCE,
};

/// Raw stream samples with numpy access.
#[pyclass]
pub struct Samples {
    /// Sample values with zero padding trimmed
    values: Vec<f32>,
    /// Handle of the data source the samples belong to
    data_source_handle: u64,
    /// Stream timestamp
    timestamp: u64,
    /// Sample rate divider
    sample_rate_divider: u32,
}

#[pymethods]
impl Samples {
    /// Returns the number of samples.
    fn __len__(&self) -> usize {
        self.values.len()
    }

    /// Returns a string representation.
    fn __repr__(&self) -> String {
        format!(
            "Samples(count={}, source={}, divider={})",
            self.values.len(),
            self.data_source_handle,
            self.sample_rate_divider
        )
    }

    /// Returns the samples as a float32 numpy array.
    #[getter]
    fn values<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        self.values.clone().into_pyarray(py)
    }

    #[getter]
    fn data_source_handle(&self) -> u64 {
        self.data_source_handle
    }

    #[getter]
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[getter]
    fn sample_rate_divider(&self) -> u32 {
        self.sample_rate_divider
    }
}

fn primary_to_dict<'py>(py: Python<'py>, header: &PrimaryHeader) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("yosiVersion", header.yosi_version)?;
    dict.set_item("dataVersion", header.data_version)?;
    dict.set_item("dataSize", header.data_size)?;
    dict.set_item("id", header.id)?;
    dict.set_item("plugIn", header.plug_in)?;
    dict.set_item("type", header.kind)?;
    dict.set_item("subType", header.sub_type)?;
    dict.set_item("name", &header.name)?;
    dict.set_item("uuid", &header.uuid)?;
    Ok(dict)
}

fn secondary_to_dict<'py>(py: Python<'py>, header: &SecondaryHeader) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("version", header.version)?;
    dict.set_item("yosemite", header.yosemite)?;
    dict.set_item("type", header.kind)?;
    dict.set_item("dataSourceCount", header.data_source_count)?;
    dict.set_item("recordSize", header.record_size)?;
    dict.set_item("timezone", header.timezone)?;
    dict.set_item("creationTime", header.creation_time)?;
    dict.set_item("timeRangeStart", header.time_range_start)?;
    dict.set_item("timeRangeEnd", header.time_range_end)?;
    dict.set_item("rawDataMetaData", header.raw_data_meta_data)?;
    dict.set_item("m_reserved", header.reserved)?;
    Ok(dict)
}

fn source_to_dict<'py>(py: Python<'py>, source: &DataSourceRecord) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("handle", source.handle)?;
    dict.set_item("parent", source.parent)?;
    dict.set_item("plugIn", source.plug_in)?;
    dict.set_item("type", source.kind)?;
    dict.set_item("subType", source.sub_type)?;
    dict.set_item("engUnit", source.eng_unit)?;
    dict.set_item("valueID", source.value_id)?;
    dict.set_item("address", source.address)?;
    dict.set_item("flags", source.flags)?;
    dict.set_item("deviceID", source.device_id)?;
    dict.set_item("deviceUUID", &source.device_uuid)?;
    dict.set_item("name", &source.name)?;
    dict.set_item("inputName", &source.input_name)?;
    dict.set_item("unitString", &source.unit_string)?;
    dict.set_item("parameters", source.parameters.clone())?;
    dict.set_item("objectType", source.object_type)?;
    dict.set_item("deviceName", &source.device_name)?;
    dict.set_item("deviceType", source.device_type)?;
    dict.set_item("deviceSerialNumber", &source.device_serial_number)?;
    dict.set_item("deviceAddress", &source.device_address)?;
    dict.set_item("devSize", source.dev_size)?;
    match &source.dev_data {
        DevData::Empty => dict.set_item("devData", 0)?,
        DevData::Hex(hex) => dict.set_item("devData", hex)?,
    }
    Ok(dict)
}

fn stream_to_dict<'py>(py: Python<'py>, stream: DataStreamRecord) -> PyResult<&'py PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("dataSourceHandle", stream.data_source_handle)?;
    dict.set_item("flags", stream.flags)?;
    dict.set_item("timestamp", stream.timestamp)?;
    dict.set_item("valueCount", stream.value_count)?;
    dict.set_item("sampleRateDivider", stream.sample_rate_divider)?;
    dict.set_item("engUnit", stream.eng_unit)?;
    let samples = Samples {
        values: stream.values,
        data_source_handle: stream.data_source_handle,
        timestamp: stream.timestamp,
        sample_rate_divider: stream.sample_rate_divider,
    };
    dict.set_item("values", Py::new(py, samples)?)?;
    Ok(dict)
}

/// Converts a decoded capture into the dict shape of the JSON output.
fn result_to_dict(py: Python<'_>, result: ParseResult) -> PyResult<PyObject> {
    let header = PyDict::new(py);
    header.set_item("ves", primary_to_dict(py, &result.header.ves)?)?;
    header.set_item("df", secondary_to_dict(py, &result.header.df)?)?;

    let sources = PyList::empty(py);
    for source in &result.data_sources {
        sources.append(source_to_dict(py, source)?)?;
    }

    let dict = PyDict::new(py);
    dict.set_item("header", header)?;
    dict.set_item("dataSources", sources)?;
    match result.raw_data_stream {
        Some(stream) => dict.set_item("rawDataStream", stream_to_dict(py, stream)?)?,
        None => dict.set_item("rawDataStream", py.None())?,
    }
    dict.set_item("declaredSources", result.stats.declared)?;
    dict.set_item("truncated", !result.notices.is_empty())?;
    Ok(dict.into())
}

fn decoder(tolerance: f64, trim: bool) -> VseDecoder {
    VseDecoder::with_options(DecoderOptions {
        trim_tolerance: tolerance,
        trim,
    })
}

fn to_py_err(err: DecodeError) -> PyErr {
    match err {
        DecodeError::Io(e) => PyIOError::new_err(format!("Failed to read file: {}", e)),
        other => PyValueError::new_err(format!("Failed to decode capture: {}", other)),
    }
}

/// Decodes an in-memory VSE004 capture.
///
/// Args:
///     data: Complete capture file contents
///     tolerance: Magnitude treated as zero padding (default: 1e-9)
///     trim: Trim zero padding from float arrays (default: True)
///
/// Returns:
///     dict: Same keys as the JSON output; rawDataStream["values"] is a Samples object
///
/// Example:
///     >>> import _vse
///     >>> capture = _vse.parse_bytes(open("Rawdata.idat", "rb").read())
///     >>> print(capture["header"]["ves"]["name"])
#[pyfunction]
#[pyo3(signature = (data, tolerance=DEFAULT_TOLERANCE, trim=true))]
fn parse_bytes(py: Python<'_>, data: &[u8], tolerance: f64, trim: bool) -> PyResult<PyObject> {
    let result = decoder(tolerance, trim).parse(data).map_err(to_py_err)?;
    result_to_dict(py, result)
}

/// Decodes a VSE004 capture file from disk.
///
/// Args:
///     path: Path to the .idat file
///     tolerance: Magnitude treated as zero padding (default: 1e-9)
///     trim: Trim zero padding from float arrays (default: True)
///
/// Returns:
///     dict: Same keys as the JSON output
#[pyfunction]
#[pyo3(signature = (path, tolerance=DEFAULT_TOLERANCE, trim=true))]
fn parse_file(py: Python<'_>, path: &str, tolerance: f64, trim: bool) -> PyResult<PyObject> {
    let path = PathBuf::from(path);
    let result = decoder(tolerance, trim)
        .decode_file(&path)
        .map_err(to_py_err)?;
    result_to_dict(py, result)
}

/// VSE004 decoder module for Python.
#[pymodule]
fn _vse(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_bytes, m)?)?;
    m.add_function(wrap_pyfunction!(parse_file, m)?)?;
    m.add_class::<Samples>()?;
    Ok(())
}
