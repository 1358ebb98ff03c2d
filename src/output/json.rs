use super::{Formatter, SampleOutput};

/// One JSON object per line
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, output: &SampleOutput) -> String {
        serde_json::to_string(output).unwrap_or_else(|e| {
            log::warn!("Failed to serialize sample {}: {}", output.index, e);
            String::new()
        })
    }
}
