//! Reading and writing sample data
//!
//! Text files hold one row of numbers per line, separated by whitespace,
//! tabs or commas. Blank lines and lines starting with `#` are skipped.
//! WAV files are mono 32-bit float.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

use crate::error::{DspError, Result};

/// Write `values` as tab-separated rows of `columns` values each
///
/// A trailing partial row is written as a shorter last line. A `columns`
/// of 0 is treated as 1.
pub fn write_columns(path: impl AsRef<Path>, values: &[f64], columns: usize) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in values.chunks(columns.max(1)) {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

/// Read every numeric row of a text file
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>> {
    parse_rows(&std::fs::read_to_string(path)?)
}

/// Parse numeric rows from text
///
/// # Errors
/// Returns `DspError::Parse` naming the 1-based line and column of the
/// first token that is not a number
pub fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(col_idx, token)| {
                token.parse::<f64>().map_err(|_| DspError::Parse {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    message: format!("not a number: {:?}", token),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Save samples as a mono 32-bit float WAV file
pub fn save_wav(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Load the first channel of a WAV file, returning samples and sample rate
///
/// Integer formats are scaled to `[-1, 1)`.
pub fn load_wav(path: impl AsRef<Path>) -> Result<(Vec<f64>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok((samples, spec.sample_rate))
}
