use std::io::Write;

use crate::{Report, ReportError, ReportWriter};

/// Pretty-printed JSON, one document per report.
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
