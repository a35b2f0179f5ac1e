//! Lists configured stores with their fetch strategy and deadline.

use crate::config::Config;

/// Renders the store table printed by the `stores` command.
pub fn list_stores(config: &Config) -> String {
    let timeouts = config.timeouts();
    let mut lines = Vec::new();

    lines.push(format!("{:<18} {:<8} {:<8} {}", "Store", "Kind", "Timeout", "Site"));
    lines.push(format!("{:-<18} {:-<8} {:-<8} {:-<30}", "", "", "", ""));

    for store in config.enabled_stores() {
        let timeout = timeouts.for_kind(store.kind());
        lines.push(format!(
            "{:<18} {:<8} {:<8} {}",
            store.name(),
            store.kind().to_string(),
            format!("{}s", timeout.as_secs_f64()),
            store.base_url()
        ));
    }

    lines.join("\n")
}
