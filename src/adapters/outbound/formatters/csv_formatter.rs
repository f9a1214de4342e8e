use chrono::NaiveDate;

use crate::inventory::domain::{AssetDetail, BomDocument};
use crate::inventory::policies::PolicySet;
use crate::inventory::services::AssetValidator;
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;

/// Fixed CSV header; variant-specific columns are left blank for the other
/// variant so every row has the same shape.
const CSV_HEADER: &str = "id,name,type,quantity,unit_cost,total_cost,algorithm,key_length,status,risk_level,vulnerability_score,cves,compliance";

/// CsvFormatter adapter for spreadsheet-friendly export
///
/// Risk levels are derived at format time against the configured policy and
/// the given reference date, so the same document can render differently as
/// certificates age out.
pub struct CsvFormatter {
    policy: PolicySet,
    today: NaiveDate,
}

impl CsvFormatter {
    pub fn new(policy: PolicySet, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    /// RFC 4180 quoting: fields containing commas, quotes, or newlines are
    /// wrapped in double quotes with embedded quotes doubled.
    fn escape_csv_field(text: &str) -> String {
        if text.contains(',') || text.contains('"') || text.contains('\n') {
            format!("\"{}\"", text.replace('"', "\"\""))
        } else {
            text.to_string()
        }
    }
}

impl BomFormatter for CsvFormatter {
    fn format(&self, document: &BomDocument) -> Result<String> {
        let mut output = String::new();
        output.push_str(CSV_HEADER);
        output.push('\n');

        for asset in &document.assets {
            let risk = AssetValidator::risk_level(asset, &self.policy, self.today);
            let compliance = asset.compliance.iter().cloned().collect::<Vec<_>>().join("; ");

            let row = match &asset.detail {
                AssetDetail::Component(c) => vec![
                    asset.id.to_string(),
                    asset.name.clone(),
                    c.category.clone(),
                    c.quantity.to_string(),
                    format!("{:.2}", c.unit_cost),
                    format!("{:.2}", asset.total_cost()),
                    String::new(),
                    String::new(),
                    String::new(),
                    risk.to_string(),
                    String::new(),
                    String::new(),
                    compliance,
                ],
                AssetDetail::Crypto(c) => vec![
                    asset.id.to_string(),
                    asset.name.clone(),
                    c.kind.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    c.algorithm.clone(),
                    c.key_length.map(|k| k.to_string()).unwrap_or_default(),
                    c.status.to_string(),
                    risk.to_string(),
                    format!("{}", c.vulnerability_score),
                    c.known_cves.iter().cloned().collect::<Vec<_>>().join("; "),
                    compliance,
                ],
            };

            let line = row
                .iter()
                .map(|field| Self::escape_csv_field(field))
                .collect::<Vec<_>>()
                .join(",");
            output.push_str(&line);
            output.push('\n');
        }

        Ok(output)
    }
}
