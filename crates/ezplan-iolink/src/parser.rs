//! Single-file template parser
//!
//! [`TemplateParser`] turns the text of one template file into a
//! [`LinerecorderSensor`]. The loader only cares whether parsing succeeded
//! and which version the record carries.

use crate::error::ParseError;
use crate::model::LinerecorderSensor;

/// Parser trait for converting template text into a record
///
/// Implementations must be stateless or internally synchronized: one parser
/// is shared by every ingestion task.
pub trait TemplateParser: Send + Sync + 'static {
    /// Parse template text
    fn parse(&self, raw: &str) -> Result<LinerecorderSensor, ParseError>;
}

impl<F> TemplateParser for F
where
    F: Fn(&str) -> Result<LinerecorderSensor, ParseError> + Send + Sync + 'static,
{
    fn parse(&self, raw: &str) -> Result<LinerecorderSensor, ParseError> {
        self(raw)
    }
}

/// Default parser for `.lrp` XML templates
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSensorParser;

impl TemplateParser for XmlSensorParser {
    fn parse(&self, raw: &str) -> Result<LinerecorderSensor, ParseError> {
        let raw = raw.trim_start_matches('\u{feff}');
        if raw.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let record: LinerecorderSensor = quick_xml::de::from_str(raw)?;
        Ok(record)
    }
}
