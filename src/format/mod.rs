//! Output formatting for item reports (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::finder::{ItemOutcome, ItemReport};
use crate::selector::reported_unit;
use serde::Serialize;

/// Flat, serializable view of one item report.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    item: &'a str,
    unit: &'a str,
    price: Option<f64>,
    per: &'a str,
    shop: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ReportRow<'a> {
    fn from_report(report: &'a ItemReport) -> Self {
        let (price, shop, status, error) = match &report.outcome {
            ItemOutcome::Found(best) => (Some(best.price), Some(best.shop.as_str()), "found", None),
            ItemOutcome::NoMatch => (None, None, "no match", None),
            ItemOutcome::Failed(e) => (None, None, "failed", Some(e.to_string())),
        };

        Self {
            item: &report.item.name,
            unit: &report.item.unit,
            price,
            per: reported_unit(&report.item.unit),
            shop,
            status,
            error,
        }
    }

    fn price_str(&self) -> String {
        self.price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "N/A".to_string())
    }

    fn shop_str(&self) -> &str {
        self.shop.unwrap_or("-")
    }
}

/// Formats item reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a batch of reports.
    pub fn format_reports(&self, reports: &[ItemReport]) -> String {
        let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from_report).collect();

        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::csv_header(),
                _ => "No items requested.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string()),
            OutputFormat::Table => Self::table(&rows),
            OutputFormat::Markdown => Self::markdown(&rows),
            OutputFormat::Csv => Self::csv(&rows),
        }
    }

    fn table(rows: &[ReportRow]) -> String {
        let item_width = rows.iter().map(|r| r.item.chars().count()).max().unwrap_or(0).max(4);
        let price_width = 10;
        let per_width = 5;
        let shop_width = 20;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<item_width$}  {:>price_width$}  {:<per_width$}  {:<shop_width$}  {}",
            "Item", "Price", "Per", "Shop", "Status"
        ));
        lines.push(format!(
            "{:-<item_width$}  {:-<price_width$}  {:-<per_width$}  {:-<shop_width$}  {:-<8}",
            "", "", "", "", ""
        ));

        for row in rows {
            let status = match &row.error {
                Some(e) => format!("{} ({})", row.status, e),
                None => row.status.to_string(),
            };

            lines.push(format!(
                "{:<item_width$}  {:>price_width$}  {:<per_width$}  {:<shop_width$}  {}",
                row.item,
                row.price_str(),
                row.per,
                row.shop_str(),
                status
            ));
        }

        let found = rows.iter().filter(|r| r.price.is_some()).count();
        lines.push(String::new());
        lines.push(format!("Found offers for {} of {} items", found, rows.len()));

        lines.join("\n")
    }

    fn markdown(rows: &[ReportRow]) -> String {
        let mut lines = Vec::new();

        lines.push("| Item | Price | Per | Shop | Status |".to_string());
        lines.push("|------|-------|-----|------|--------|".to_string());

        for row in rows {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                row.item,
                row.price_str(),
                row.per,
                row.shop_str(),
                row.status
            ));
        }

        let found = rows.iter().filter(|r| r.price.is_some()).count();
        lines.push(String::new());
        lines.push(format!("*{} of {} items priced*", found, rows.len()));

        lines.join("\n")
    }

    fn csv_header() -> String {
        "item,unit,price,per,shop,status,error".to_string()
    }

    fn csv(rows: &[ReportRow]) -> String {
        let mut lines = Vec::new();
        lines.push(Self::csv_header());

        for row in rows {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(row.item),
                Self::csv_escape(row.unit),
                row.price.map(|p| p.to_string()).unwrap_or_default(),
                row.per,
                row.shop.map(Self::csv_escape).unwrap_or_default(),
                row.status,
                row.error.as_deref().map(Self::csv_escape).unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
