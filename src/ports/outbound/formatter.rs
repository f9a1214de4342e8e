use crate::inventory::domain::BomDocument;
use crate::shared::Result;

/// BomFormatter port for rendering BOM output
///
/// This port abstracts the formatting logic for the supported export
/// formats (JSON, CSV, Markdown report).
pub trait BomFormatter {
    /// Renders a BOM document to its textual representation
    ///
    /// # Arguments
    /// * `document` - The BOM document containing metadata, assets, and the
    ///   audit history
    ///
    /// # Returns
    /// Formatted content as a string
    ///
    /// # Errors
    /// Returns an error if formatting or serialization fails
    fn format(&self, document: &BomDocument) -> Result<String>;
}
