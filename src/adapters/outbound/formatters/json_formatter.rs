use crate::inventory::domain::BomDocument;
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;

/// JsonFormatter adapter producing the canonical JSON document
///
/// This is the round-trip format: a document exported here can be imported
/// back without loss (the export serial number excepted).
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for JsonFormatter {
    fn format(&self, document: &BomDocument) -> Result<String> {
        let mut json = serde_json::to_string_pretty(document)?;
        json.push('\n');
        Ok(json)
    }
}
