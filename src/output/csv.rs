use super::{Formatter, SampleOutput, optional};

/// Comma or tab separated rows; missing fields are left empty
pub struct DelimitedFormatter {
    delimiter: char,
}

impl DelimitedFormatter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Formatter for DelimitedFormatter {
    fn format(&self, output: &SampleOutput) -> String {
        let d = self.delimiter;
        format!(
            "{}{d}{:.6}{d}{:.6}{d}{}{d}{}",
            output.index,
            output.input,
            output.output,
            optional(output.error, ""),
            optional(output.variance, "")
        )
    }

    fn header(&self) -> Option<&'static str> {
        if self.delimiter == '\t' {
            Some("index\tinput\toutput\terror\tvariance")
        } else {
            Some("index,input,output,error,variance")
        }
    }
}
