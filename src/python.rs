//! Python bindings

use pyo3::prelude::*;

use crate::wmf;

/// Convert a WMF file to an SVG file
#[pyfunction]
fn convert_wmf_file_to_svg(input_path: &str, output_path: &str) -> PyResult<bool> {
    let input = std::path::Path::new(input_path);
    if !input.exists() {
        return Err(PyErr::new::<pyo3::exceptions::PyFileNotFoundError, _>(format!(
            "Input file not found: {}",
            input_path
        )));
    }

    let data = std::fs::read(input).map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyIOError, _>(format!("Failed to read input file: {}", e))
    })?;
    let svg_content = wmf::convert_wmf_to_svg(&data)?;

    std::fs::write(output_path, svg_content).map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyIOError, _>(format!("Failed to write output file: {}", e))
    })?;
    Ok(true)
}

/// Convert WMF bytes to an SVG string
#[pyfunction]
fn convert_wmf_bytes_to_svg(wmf_data: &[u8]) -> PyResult<String> {
    if !wmf::is_wmf_format(wmf_data) {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            "Input must be WMF data",
        ));
    }
    Ok(wmf::convert_wmf_to_svg(wmf_data)?)
}

/// Python module for the WMF player
#[pymodule]
fn wmf_player(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert_wmf_file_to_svg, m)?)?;
    m.add_function(wrap_pyfunction!(convert_wmf_bytes_to_svg, m)?)?;
    Ok(())
}
