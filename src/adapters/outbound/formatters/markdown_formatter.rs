use chrono::NaiveDate;

use crate::inventory::domain::{Asset, AssetDetail, Bom, BomDocument};
use crate::inventory::policies::PolicySet;
use crate::inventory::services::{AssetValidator, BomValidator, PostureReport};
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;

/// Markdown table header for the asset risk table
const RISK_TABLE_HEADER: &str = "| ID | Name | Type | Status | Risk | Algorithm |\n";

/// Markdown table separator line
const RISK_TABLE_SEPARATOR: &str = "|----|------|------|--------|------|-----------|\n";

/// MarkdownFormatter adapter generating the human-readable audit report
///
/// This adapter implements the BomFormatter port for Markdown output:
/// inventory summary, security posture, per-asset risk table, and
/// remediation recommendations.
pub struct MarkdownFormatter {
    policy: PolicySet,
    today: NaiveDate,
}

impl MarkdownFormatter {
    pub fn new(policy: PolicySet, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn render_header(&self, output: &mut String, document: &BomDocument) {
        output.push_str(&format!(
            "# Bill of Materials Report: {}\n\n",
            document.metadata.project_name
        ));
        if !document.metadata.description.is_empty() {
            output.push_str(&document.metadata.description);
            output.push_str("\n\n");
        }
        output.push_str(&format!(
            "- Created: {}\n- Report date: {}\n\n",
            document.metadata.created_at.format("%Y-%m-%d"),
            self.today
        ));
    }

    fn render_summary(&self, output: &mut String, bom: &Bom) {
        let summary = bom.summary(self.today);
        output.push_str("## Inventory Summary\n\n");
        output.push_str(&format!("- Total assets: {}\n", summary.total_assets));
        output.push_str(&format!("- Total cost: ${:.2}\n", summary.total_cost));
        for (label, count) in &summary.type_counts {
            output.push_str(&format!("- {}: {}\n", label, count));
        }
        output.push('\n');
    }

    fn render_posture(&self, output: &mut String, posture: &PostureReport) {
        output.push_str("## Security Posture\n\n");
        output.push_str(&format!(
            "**Score: {:.0}/100 ({})**\n\n",
            posture.security_score, posture.posture
        ));
        output.push_str(&format!(
            "- Critical: {}\n- High: {}\n- Medium: {}\n- Low: {}\n",
            posture.critical, posture.high, posture.medium, posture.low
        ));
        output.push_str(&format!(
            "- Vulnerable assets: {}\n- Expired assets: {}\n\n",
            posture.vulnerable, posture.expired
        ));
    }

    fn render_risk_table(&self, output: &mut String, assets: &[Asset]) {
        output.push_str("## Assets by Risk\n\n");
        output.push_str(RISK_TABLE_HEADER);
        output.push_str(RISK_TABLE_SEPARATOR);

        // CRITICAL first; ties keep insertion order (sort is stable)
        let mut ordered: Vec<&Asset> = assets.iter().collect();
        ordered.sort_by_key(|a| {
            std::cmp::Reverse(AssetValidator::risk_level(a, &self.policy, self.today))
        });

        for asset in ordered {
            let risk = AssetValidator::risk_level(asset, &self.policy, self.today);
            let (type_label, status, algorithm) = match &asset.detail {
                AssetDetail::Component(c) => (c.category.clone(), String::new(), String::new()),
                AssetDetail::Crypto(c) => {
                    (c.kind.to_string(), c.status.to_string(), c.algorithm.clone())
                }
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                asset.id,
                Self::escape_markdown_table_cell(&asset.name),
                Self::escape_markdown_table_cell(&type_label),
                status,
                risk,
                Self::escape_markdown_table_cell(&algorithm)
            ));
        }
        output.push('\n');
    }

    fn render_recommendations(&self, output: &mut String, recommendations: &[String]) {
        output.push_str("## Recommendations\n\n");
        if recommendations.is_empty() {
            output.push_str("No remediation required.\n");
            return;
        }
        for recommendation in recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
    }
}

impl BomFormatter for MarkdownFormatter {
    fn format(&self, document: &BomDocument) -> Result<String> {
        let bom = Bom::from_document(document.clone())?;
        let posture = BomValidator::security_posture(&bom, &self.policy, self.today);
        let recommendations = BomValidator::recommendations(&bom, &self.policy, self.today);

        let mut output = String::new();
        self.render_header(&mut output, document);
        self.render_summary(&mut output, &bom);
        self.render_posture(&mut output, &posture);
        self.render_risk_table(&mut output, document.assets.as_slice());
        self.render_recommendations(&mut output, &recommendations);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{ComponentDetail, CryptoDetail, CryptoKind};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn sample_document() -> BomDocument {
        let mut bom = Bom::new("Gadget Mk II", "Mainboard inventory");
        bom.add(
            Asset::component(
                "R1",
                "Resistor 10k",
                ComponentDetail {
                    category: "Resistors".to_string(),
                    quantity: 10,
                    unit_cost: 0.05,
                    supplier: String::new(),
                    part_number: String::new(),
                },
            )
            .unwrap(),
            "alice",
        )
        .unwrap();
        bom.add(
            Asset::crypto(
                "LEGACY",
                "Legacy SHA-1 Hashing",
                CryptoDetail::new(CryptoKind::Algorithm, "SHA-1"),
            )
            .unwrap(),
            "alice",
        )
        .unwrap();
        bom.to_document()
    }

    #[test]
    fn test_report_sections_present() {
        let formatter = MarkdownFormatter::new(PolicySet::default(), today());
        let output = formatter.format(&sample_document()).unwrap();

        assert!(output.contains("# Bill of Materials Report: Gadget Mk II"));
        assert!(output.contains("## Inventory Summary"));
        assert!(output.contains("## Security Posture"));
        assert!(output.contains("## Assets by Risk"));
        assert!(output.contains("## Recommendations"));
    }

    #[test]
    fn test_posture_score_rendered() {
        let formatter = MarkdownFormatter::new(PolicySet::default(), today());
        let output = formatter.format(&sample_document()).unwrap();
        // One HIGH finding (SHA-1): 100 - 10
        assert!(output.contains("**Score: 90/100 (EXCELLENT)**"));
    }

    #[test]
    fn test_risk_table_sorted_by_severity() {
        let formatter = MarkdownFormatter::new(PolicySet::default(), today());
        let output = formatter.format(&sample_document()).unwrap();
        let legacy_pos = output.find("| LEGACY |").unwrap();
        let resistor_pos = output.find("| R1 |").unwrap();
        assert!(legacy_pos < resistor_pos);
    }

    #[test]
    fn test_recommendation_for_weak_algorithm() {
        let formatter = MarkdownFormatter::new(PolicySet::default(), today());
        let output = formatter.format(&sample_document()).unwrap();
        assert!(output.contains("replace weak algorithm 'SHA-1'"));
    }

    #[test]
    fn test_clean_bom_has_no_recommendations() {
        let mut bom = Bom::new("Clean", "");
        bom.add(
            Asset::crypto(
                "AES-1",
                "AES-256-GCM Data Encryption",
                CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM"),
            )
            .unwrap(),
            "alice",
        )
        .unwrap();

        let formatter = MarkdownFormatter::new(PolicySet::default(), today());
        let output = formatter.format(&bom.to_document()).unwrap();
        assert!(output.contains("No remediation required."));
    }
}
