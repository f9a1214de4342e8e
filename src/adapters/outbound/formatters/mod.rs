/// Formatter adapters for the supported BOM export formats
mod csv_formatter;
mod json_formatter;
mod markdown_formatter;

pub use csv_formatter::CsvFormatter;
pub use json_formatter::JsonFormatter;
pub use markdown_formatter::MarkdownFormatter;
