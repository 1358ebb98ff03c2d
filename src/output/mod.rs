mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

pub use self::csv::DelimitedFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Tsv,
    Json,
}

/// One filtered sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleOutput {
    pub index: usize,
    pub input: f64,
    pub output: f64,
    /// Prediction error, for adaptive filters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    /// Posterior variance, for the Kalman filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
}

impl SampleOutput {
    pub fn new(index: usize, input: f64, output: f64) -> Self {
        Self {
            index,
            input,
            output,
            error: None,
            variance: None,
        }
    }
}

pub trait Formatter: Send {
    fn format(&self, output: &SampleOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Csv => Box::new(DelimitedFormatter::new(',')),
        OutputFormat::Tsv => Box::new(DelimitedFormatter::new('\t')),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn optional(value: Option<f64>, missing: &str) -> String {
    value.map_or(missing.to_string(), |v| format!("{:.6}", v))
}
