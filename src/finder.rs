//! Batch driver: query, fetch, filter and select for each requested item.

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::OfferError;
use crate::etilbud::{BestOffer, ItemRequest, OfferClient, OfferSource, SearchParams, SearchQuery};
use crate::filters;
use crate::selector::select_best;
use tracing::{debug, info, warn};

/// What happened to one requested item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The cheapest matching offer.
    Found(BestOffer),
    /// The search worked but no offer matched the heading and unit.
    NoMatch,
    /// The item could not be resolved.
    Failed(OfferError),
}

/// An item paired with its outcome.
#[derive(Debug)]
pub struct ItemReport {
    pub item: ItemRequest,
    pub outcome: ItemOutcome,
}

impl ItemReport {
    pub fn best(&self) -> Option<&BestOffer> {
        match &self.outcome {
            ItemOutcome::Found(best) => Some(best),
            _ => None,
        }
    }
}

/// Finds the cheapest offer per item through an [`OfferSource`].
pub struct OfferFinder<S: OfferSource> {
    source: S,
    params: SearchParams,
}

impl OfferFinder<OfferClient> {
    /// Creates a finder backed by the HTTP client.
    pub fn from_config(config: &Config, credentials: Credentials) -> Self {
        Self::new(OfferClient::new(config, credentials))
    }
}

impl<S: OfferSource> OfferFinder<S> {
    /// Creates a finder with the default search parameters.
    pub fn new(source: S) -> Self {
        Self::with_params(source, SearchParams::default())
    }

    pub fn with_params(source: S, params: SearchParams) -> Self {
        Self { source, params }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves one item.
    ///
    /// `Ok(None)` means no offer survived filtering. Errors cover a blank
    /// name, fetch failures, and filtered offers that all lack pricing.
    pub async fn find_best_offer(&self, item: &ItemRequest) -> Result<Option<BestOffer>, OfferError> {
        let query = SearchQuery::new(&item.name, self.params.clone())?;
        let offers = self.source.search(&query).await?;
        let received = offers.len();

        let chain = filters::for_item(query.term(), &item.unit);
        debug!("{}: filters [{}]", item, chain.descriptions().join(", "));

        let candidates = chain.apply(offers);
        debug!("{}: {} of {} offers match", item, candidates.len(), received);

        if candidates.is_empty() {
            return Ok(None);
        }

        select_best(&candidates, &item.unit).map(Some)
    }

    /// Resolves every item in order, reporting each outcome.
    pub async fn find_outcomes(&self, items: &[ItemRequest]) -> Vec<ItemReport> {
        let mut reports = Vec::with_capacity(items.len());

        for item in items {
            let outcome = match self.find_best_offer(item).await {
                Ok(Some(best)) => {
                    info!("{}: {:.2} at {}", item, best.price, best.shop);
                    ItemOutcome::Found(best)
                }
                Ok(None) => {
                    info!("{}: no matching offers", item);
                    ItemOutcome::NoMatch
                }
                Err(e) => {
                    warn!("{}: skipped: {}", item, e);
                    ItemOutcome::Failed(e)
                }
            };

            reports.push(ItemReport { item: item.clone(), outcome });
        }

        reports
    }

    /// Returns the best offer for each resolvable item, in input order.
    ///
    /// Items that fail or have no match are left out.
    pub async fn find_best_offers(&self, items: &[ItemRequest]) -> Vec<BestOffer> {
        let offers: Vec<BestOffer> = self
            .find_outcomes(items)
            .await
            .into_iter()
            .filter_map(|report| match report.outcome {
                ItemOutcome::Found(best) => Some(best),
                _ => None,
            })
            .collect();

        debug!("Resolved {} of {} items", offers.len(), items.len());
        offers
    }

    /// Releases the source's connection.
    pub fn close(&self) {
        self.source.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etilbud::Offer;
    use crate::filters::test_support::make_offer;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Mock offer source keyed by search term.
    #[derive(Default)]
    struct MockSource {
        offers: HashMap<String, Vec<Offer>>,
        failing: HashMap<String, u16>,
        unreachable: Vec<String>,
        calls: AtomicU32,
        closed: AtomicBool,
    }

    impl MockSource {
        fn with(mut self, term: &str, offers: Vec<Offer>) -> Self {
            self.offers.insert(term.to_string(), offers);
            self
        }

        fn with_status(mut self, term: &str, status: u16) -> Self {
            self.failing.insert(term.to_string(), status);
            self
        }

        fn with_unreachable(mut self, term: &str) -> Self {
            self.unreachable.push(term.to_string());
            self
        }
    }

    #[async_trait]
    impl OfferSource for MockSource {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<Offer>, OfferError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable.iter().any(|t| t == query.term()) {
                return Err(OfferError::Transport("connection refused".to_string()));
            }
            if let Some(status) = self.failing.get(query.term()) {
                return Err(OfferError::Status { status: *status });
            }
            Ok(self.offers.get(query.term()).cloned().unwrap_or_default())
        }

        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    fn milk_offers() -> Vec<Offer> {
        vec![
            make_offer("Milk 1L", "l", 1.0, 10.0, "A"),
            make_offer("Milk 2L", "l", 2.0, 16.0, "B"),
        ]
    }

    fn butter_offers() -> Vec<Offer> {
        vec![make_offer("Butter", "g", 500.0, 20.0, "C")]
    }

    fn items() -> Vec<ItemRequest> {
        vec![ItemRequest::new("milk", "l"), ItemRequest::new("butter", "g")]
    }

    #[tokio::test]
    async fn test_padded_name_matches_trimmed_term() {
        let source = MockSource::default().with("milk", milk_offers());
        let finder = OfferFinder::new(source);

        let best = finder.find_best_offer(&ItemRequest::new("  milk ", "l")).await.unwrap();
        assert_eq!(best, Some(BestOffer { price: 8.0, shop: "B".to_string() }));
    }

    #[tokio::test]
    async fn test_batch_example() {
        let source = MockSource::default().with("milk", milk_offers()).with("butter", butter_offers());
        let finder = OfferFinder::new(source);

        let results = finder.find_best_offers(&items()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], BestOffer { price: 8.0, shop: "B".to_string() });
        assert_eq!(results[1].shop, "C");
        assert!((results[1].price - 40.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_connection_failure_skips_only_that_item() {
        let source = MockSource::default().with_unreachable("milk").with("butter", butter_offers());
        let finder = OfferFinder::new(source);

        let results = finder.find_best_offers(&items()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].shop, "C");
    }

    #[tokio::test]
    async fn test_http_error_skips_item() {
        let source = MockSource::default().with_status("milk", 401).with("butter", butter_offers());
        let finder = OfferFinder::new(source);

        let reports = finder.find_outcomes(&items()).await;
        assert!(matches!(reports[0].outcome, ItemOutcome::Failed(OfferError::Status { status: 401 })));
        assert!(reports[1].best().is_some());
    }

    #[tokio::test]
    async fn test_no_match_is_skipped() {
        let source = MockSource::default()
            .with("milk", vec![make_offer("Milk 1L", "ml", 1000.0, 10.0, "A")])
            .with("butter", butter_offers());
        let finder = OfferFinder::new(source);

        let reports = finder.find_outcomes(&items()).await;
        assert!(matches!(reports[0].outcome, ItemOutcome::NoMatch));

        let results = finder.find_best_offers(&items()).await;
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_query_sends_no_request() {
        let source = MockSource::default().with("butter", butter_offers());
        let finder = OfferFinder::new(source);

        let batch = vec![ItemRequest::new("", "l"), ItemRequest::new("butter", "g")];
        let reports = finder.find_outcomes(&batch).await;

        assert!(matches!(reports[0].outcome, ItemOutcome::Failed(OfferError::MissingQuery)));
        assert!(reports[1].best().is_some());
        assert_eq!(finder.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_item_missing_query_errors() {
        let finder = OfferFinder::new(MockSource::default());
        let err = finder.find_best_offer(&ItemRequest::new("  ", "g")).await.unwrap_err();
        assert!(matches!(err, OfferError::MissingQuery));
    }

    #[tokio::test]
    async fn test_unpriced_matches_fail_with_no_offers() {
        let mut offer = make_offer("Milk", "l", 1.0, 10.0, "A");
        offer.pricing = None;
        let finder = OfferFinder::new(MockSource::default().with("milk", vec![offer]));

        let err = finder.find_best_offer(&ItemRequest::new("milk", "l")).await.unwrap_err();
        assert!(matches!(err, OfferError::NoOffers));
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let source = MockSource::default()
            .with("a", vec![make_offer("a", "l", 1.0, 3.0, "A")])
            .with("c", vec![make_offer("c", "l", 1.0, 1.0, "C")])
            .with("d", vec![make_offer("d", "l", 1.0, 2.0, "D")]);
        let finder = OfferFinder::new(source);

        let batch: Vec<ItemRequest> =
            ["a:l", "b:l", "c:l", "d:l"].iter().map(|s| s.parse().unwrap()).collect();
        let shops: Vec<String> =
            finder.find_best_offers(&batch).await.into_iter().map(|o| o.shop).collect();

        assert_eq!(shops, vec!["A", "C", "D"]);
    }

    #[tokio::test]
    async fn test_heading_match_ignores_case() {
        let source = MockSource::default().with("mælk", vec![make_offer("ARLA MÆLK", "l", 1.0, 11.0, "Netto")]);
        let finder = OfferFinder::new(source);

        let best = finder.find_best_offer(&ItemRequest::new("mælk", "l")).await.unwrap();
        assert_eq!(best.unwrap().shop, "Netto");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let finder = OfferFinder::new(MockSource::default());
        assert!(finder.find_best_offers(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_close_releases_source() {
        let finder = OfferFinder::new(MockSource::default());
        finder.close();
        assert!(finder.source().closed.load(Ordering::SeqCst));
    }
}
