use super::{Formatter, SampleOutput, optional};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &SampleOutput) -> String {
        if self.verbose {
            format!(
                "[{}] {:.6} -> {:.6} (e: {}, p: {})",
                output.index,
                output.input,
                output.output,
                optional(output.error, "-"),
                optional(output.variance, "-")
            )
        } else {
            format!(
                "[{}] {:.6} -> {:.6}",
                output.index, output.input, output.output
            )
        }
    }
}
