//! Best-offer search command implementation.

use crate::config::Config;
use crate::etilbud::{ItemRequest, OfferSource};
use crate::finder::OfferFinder;
use crate::format::Formatter;
use crate::states::{publish_offers, MemoryStates};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Finds the cheapest offer for each requested item.
pub struct FindCommand {
    config: Config,
    states: bool,
}

impl FindCommand {
    pub fn new(config: Config) -> Self {
        Self { config, states: false }
    }

    /// Prints results as entity states instead of a report.
    pub fn with_states(mut self, enabled: bool) -> Self {
        self.states = enabled;
        self
    }

    /// Runs the search against the live API and returns formatted output.
    pub async fn execute(&self, items: &[ItemRequest]) -> Result<String> {
        let credentials = self.config.credentials()?;
        let finder = OfferFinder::from_config(&self.config, credentials);

        let output = self.execute_with_finder(&finder, items).await;
        finder.close();
        output
    }

    /// Runs the search with a provided finder (for testing).
    pub async fn execute_with_finder<S: OfferSource>(
        &self,
        finder: &OfferFinder<S>,
        items: &[ItemRequest],
    ) -> Result<String> {
        if items.is_empty() {
            anyhow::bail!("No items given. Pass name:unit pairs, --items-file, or set items in config");
        }

        info!("Finding best offers for {} items", items.len());
        let reports = finder.find_outcomes(items).await;

        if self.states {
            let offers: Vec<_> = reports.iter().filter_map(|r| r.best().cloned()).collect();
            let mut states = MemoryStates::default();
            publish_offers(&mut states, &offers);

            return Ok(states
                .iter()
                .map(|(entity_id, value)| format!("{} = {:.2}", entity_id, value))
                .collect::<Vec<_>>()
                .join("\n"));
        }

        Ok(Formatter::new(self.config.format).format_reports(&reports))
    }
}

/// Reads items from a JSON file of `[name, unit]` pairs.
pub fn load_items_file(path: &Path) -> Result<Vec<ItemRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read items file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse items file: {}", path.display()))
}
