//! Output formatting for offers (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::stores::Offer;

/// Formats offers for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a list of offers, already in display order.
    pub fn format_offers(&self, offers: &[Offer]) -> String {
        if offers.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::csv_header(),
                _ => "No offers found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_offers(offers),
            OutputFormat::Table => self.table_offers(offers),
            OutputFormat::Markdown => self.markdown_offers(offers),
            OutputFormat::Csv => self.csv_offers(offers),
        }
    }

    fn json_offers(&self, offers: &[Offer]) -> String {
        serde_json::to_string_pretty(offers).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_offers(&self, offers: &[Offer]) -> String {
        let store_width = 15;
        let price_width = 12;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<store_width$}  {:>price_width$}  {:<title_width$}  {}",
            "Store", "Price", "Title", "Link"
        ));
        lines.push(format!(
            "{:-<store_width$}  {:-<price_width$}  {:-<title_width$}  {:-<4}",
            "", "", "", ""
        ));

        for offer in offers {
            lines.push(format!(
                "{:<store_width$}  {:>price_width$}  {:<title_width$}  {}",
                offer.store,
                offer.price,
                truncate(offer.title_or_empty(), title_width),
                offer.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} offers", offers.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();

        lines.push("| Store | Price | Title |".to_string());
        lines.push("|-------|-------|-------|".to_string());

        for offer in offers {
            let title = truncate(offer.title_or_empty(), 40).replace('|', "\\|");
            lines.push(format!("| {} | {} | [{}]({}) |", offer.store, offer.price, title, offer.url));
        }

        lines.push(String::new());
        lines.push(format!("*{} offers found*", offers.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header() -> String {
        "store,title,price,url".to_string()
    }

    fn csv_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();
        lines.push(Self::csv_header());

        for offer in offers {
            lines.push(format!(
                "{},{},{},{}",
                Self::csv_escape(&offer.store),
                Self::csv_escape(offer.title_or_empty()),
                Self::csv_escape(&offer.price),
                Self::csv_escape(&offer.url)
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

/// Shortens `s` to at most `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offers() -> Vec<Offer> {
        vec![
            Offer::new("Fanatical", "Hades", "€4,99", "https://www.fanatical.com/en/game/hades"),
            Offer::new("CDKeys", "Hades, Deluxe \"GOTY\"", "$9.99", "https://www.cdkeys.com/hades"),
        ]
    }

    #[test]
    fn test_empty_output_per_format() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_offers(&[]), "[]");
        assert_eq!(Formatter::new(OutputFormat::Csv).format_offers(&[]), "store,title,price,url");
        assert_eq!(Formatter::new(OutputFormat::Table).format_offers(&[]), "No offers found.");
        assert_eq!(Formatter::new(OutputFormat::Markdown).format_offers(&[]), "No offers found.");
    }

    #[test]
    fn test_table_output() {
        let output = Formatter::new(OutputFormat::Table).format_offers(&make_offers());
        assert!(output.contains("Store"));
        assert!(output.contains("Fanatical"));
        assert!(output.contains("€4,99"));
        assert!(output.contains("Total: 2 offers"));
    }

    #[test]
    fn test_json_output_keeps_order() {
        let output = Formatter::new(OutputFormat::Json).format_offers(&make_offers());
        let parsed: Vec<Offer> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, make_offers());
    }

    #[test]
    fn test_markdown_output() {
        let output = Formatter::new(OutputFormat::Markdown).format_offers(&make_offers());
        assert!(output.starts_with("| Store | Price | Title |"));
        assert!(output.contains("[Hades](https://www.fanatical.com/en/game/hades)"));
        assert!(output.contains("*2 offers found*"));
    }

    #[test]
    fn test_csv_escaping() {
        let output = Formatter::new(OutputFormat::Csv).format_offers(&make_offers());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], r#"CDKeys,"Hades, Deluxe ""GOTY""",$9.99,https://www.cdkeys.com/hades"#);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ÆÆÆÆÆÆÆÆÆÆÆÆ", 6), "ÆÆÆ...");
    }
}
