//! Subscription Decision & Dispatch
//!
//! Given a completed order, decides which campaigns the buyer should be
//! added to and issues at most one subscribe call per target. Failures are
//! logged and swallowed; the purchase flow is never blocked or rolled back
//! by a mailing-list error.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::SignupConfig;
use crate::error::SignupError;
use crate::marker::PendingSignupStore;
use crate::model::Order;
use crate::provider::{NewsletterProvider, SubscribeOutcome};

/// Result of one subscribe attempt
#[derive(Debug)]
pub struct CampaignResult {
    pub campaign_id: String,
    pub outcome: Result<SubscribeOutcome, SignupError>,
}

/// Per-order dispatch report
///
/// One entry per target campaign, in resolution order. An order that did
/// not opt in, or had nothing to subscribe to, produces an empty report.
#[derive(Debug)]
pub struct DispatchReport {
    pub order_id: String,
    pub results: Vec<CampaignResult>,
    pub completed_at: DateTime<Utc>,
}

impl DispatchReport {
    fn empty(order_id: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            results: Vec::new(),
            completed_at: Utc::now(),
        }
    }

    /// True when at least one campaign accepted the buyer
    pub fn subscribed(&self) -> bool {
        self.results.iter().any(|r| r.outcome.is_ok())
    }
}

/// Subscription decision and dispatch service
///
/// Dependencies are passed in explicitly; there is no ambient global
/// plugin object.
pub struct SignupDispatcher {
    config: Arc<dyn SignupConfig>,
    provider: Arc<dyn NewsletterProvider>,
    pending: Arc<dyn PendingSignupStore>,
}

impl SignupDispatcher {
    pub fn new(
        config: Arc<dyn SignupConfig>,
        provider: Arc<dyn NewsletterProvider>,
        pending: Arc<dyn PendingSignupStore>,
    ) -> Self {
        Self {
            config,
            provider,
            pending,
        }
    }

    /// Record that the buyer checked the signup box at checkout.
    ///
    /// The host calls this from its checkout submission path; the marker is
    /// consumed when the completion event fires.
    pub fn record_checkout_optin(&self, order_id: &str) {
        self.pending.mark_pending(order_id);
    }

    /// Handle a completed order.
    ///
    /// Resolves the target campaign set, subscribes the buyer to each
    /// target, and consumes the order's pending marker. Safe to call again
    /// for the same order: the consumed marker and the provider's
    /// already-subscribed check both prevent duplicate contacts.
    pub async fn on_order_completed(&self, order: &Order) -> DispatchReport {
        let opted_in = order.opted_in || self.pending.is_pending(&order.id);

        if !opted_in && !self.config.auto_subscribe() {
            tracing::debug!(order_id = %order.id, "buyer did not opt in, skipping signup");
            return DispatchReport::empty(&order.id);
        }

        let targets = self.resolve_targets(order);

        if targets.is_empty() {
            tracing::debug!(order_id = %order.id, "no campaign configured, nothing to subscribe");
            self.pending.clear_pending(&order.id);
            return DispatchReport::empty(&order.id);
        }

        let mut results = Vec::with_capacity(targets.len());

        for campaign_id in targets {
            let outcome = self.provider.subscribe(&order.buyer, &campaign_id).await;

            match &outcome {
                Ok(result) => {
                    tracing::info!(
                        order_id = %order.id,
                        campaign_id = %campaign_id,
                        outcome = ?result,
                        "signup processed"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        order_id = %order.id,
                        campaign_id = %campaign_id,
                        error = %err,
                        "signup failed"
                    );
                }
            }

            results.push(CampaignResult {
                campaign_id,
                outcome,
            });
        }

        // Consume the marker so a re-fired completion event is a no-op
        self.pending.clear_pending(&order.id);

        DispatchReport {
            order_id: order.id.clone(),
            results,
            completed_at: Utc::now(),
        }
    }

    /// Resolve the target campaign set for an order.
    ///
    /// Union of per-product overrides (bundles contribute their own
    /// override plus those of every bundled product), falling back to the
    /// site default when no override applies. De-duplicated, blank IDs
    /// dropped, first-seen order preserved.
    fn resolve_targets(&self, order: &Order) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();

        for item in &order.items {
            for campaign_id in self.config.product_campaigns(&item.product_id) {
                Self::push_unique(&mut targets, &campaign_id);
            }

            for bundled_id in &item.bundled_product_ids {
                for campaign_id in self.config.product_campaigns(bundled_id) {
                    Self::push_unique(&mut targets, &campaign_id);
                }
            }
        }

        if targets.is_empty() {
            if let Some(default) = self.config.default_campaign() {
                Self::push_unique(&mut targets, &default);
            }
        }

        targets
    }

    fn push_unique(targets: &mut Vec<String>, campaign_id: &str) {
        let campaign_id = campaign_id.trim();

        if campaign_id.is_empty() || targets.iter().any(|t| t == campaign_id) {
            return;
        }

        targets.push(campaign_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::MemoryConfig;
    use crate::error::Result;
    use crate::marker::MemoryPendingStore;
    use crate::model::{Buyer, LineItem};

    /// Mock provider that records subscribe calls
    struct MockProvider {
        calls: Mutex<Vec<String>>,
        /// Emails treated as already subscribed
        existing: Vec<String>,
        /// Fail every subscribe call
        fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                existing: Vec::new(),
                fail: false,
            }
        }

        fn with_existing(emails: Vec<String>) -> Self {
            Self {
                existing: emails,
                ..Self::new()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsletterProvider for MockProvider {
        async fn campaigns(&self) -> HashMap<String, String> {
            HashMap::new()
        }

        async fn subscribe(&self, buyer: &Buyer, campaign_id: &str) -> Result<SubscribeOutcome> {
            self.calls.lock().unwrap().push(campaign_id.to_string());

            if self.fail {
                return Err(SignupError::ProviderUnreachable("connection refused".into()));
            }

            if self.existing.contains(&buyer.email) {
                Ok(SubscribeOutcome::AlreadySubscribed)
            } else {
                Ok(SubscribeOutcome::Subscribed)
            }
        }

        fn name(&self) -> &str {
            "Mock"
        }
    }

    fn buyer() -> Buyer {
        Buyer::new("jane@example.com", "Jane", "Doe", "203.0.113.7")
    }

    fn dispatcher(
        config: Arc<MemoryConfig>,
        provider: Arc<MockProvider>,
    ) -> (SignupDispatcher, Arc<MemoryPendingStore>) {
        let pending = Arc::new(MemoryPendingStore::new());
        let dispatcher = SignupDispatcher::new(config, provider, pending.clone());
        (dispatcher, pending)
    }

    #[tokio::test]
    async fn test_no_optin_makes_no_calls() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", false, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        assert!(provider.calls().is_empty());
        assert!(!report.subscribed());
    }

    #[tokio::test]
    async fn test_auto_subscribe_overrides_optin() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));
        config.set_auto_subscribe(true);

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", false, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        assert_eq!(provider.calls(), vec!["C0"]);
        assert!(report.subscribed());
    }

    #[tokio::test]
    async fn test_product_override_beats_default() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));
        config.set_product_campaigns("dl-1", vec!["C1".into()]);

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", true, vec![LineItem::product("dl-1")], buyer());
        dispatcher.on_order_completed(&order).await;

        assert_eq!(provider.calls(), vec!["C1"]);
    }

    #[tokio::test]
    async fn test_bundle_unions_constituent_overrides() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_product_campaigns("bundle-1", vec!["C1".into()]);
        config.set_product_campaigns("dl-2", vec!["C2".into()]);
        config.set_product_campaigns("dl-3", vec!["C3".into(), "C2".into()]);

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new(
            "order-1",
            true,
            vec![LineItem::bundle(
                "bundle-1",
                vec!["dl-2".into(), "dl-3".into()],
            )],
            buyer(),
        );
        dispatcher.on_order_completed(&order).await;

        assert_eq!(provider.calls(), vec!["C1", "C2", "C3"]);
    }

    #[tokio::test]
    async fn test_duplicate_campaigns_collapse_to_one_call() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_product_campaigns("dl-1", vec!["C1".into()]);
        config.set_product_campaigns("dl-2", vec!["C1".into()]);

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new(
            "order-1",
            true,
            vec![LineItem::product("dl-1"), LineItem::product("dl-2")],
            buyer(),
        );
        dispatcher.on_order_completed(&order).await;

        assert_eq!(provider.calls(), vec!["C1"]);
    }

    #[tokio::test]
    async fn test_no_override_no_default_is_noop() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", true, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        assert!(provider.calls().is_empty());
        assert!(!report.subscribed());
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_blank_override_falls_back_to_default() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));
        config.set_product_campaigns("dl-1", vec!["  ".into()]);

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", true, vec![LineItem::product("dl-1")], buyer());
        dispatcher.on_order_completed(&order).await;

        assert_eq!(provider.calls(), vec!["C0"]);
    }

    #[tokio::test]
    async fn test_marker_consumed_on_duplicate_completion() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));

        let provider = Arc::new(MockProvider::new());
        let (dispatcher, pending) = dispatcher(config, provider.clone());

        // Checkbox checked at checkout, but the host does not pass the flag
        // on its completion event
        dispatcher.record_checkout_optin("order-1");

        let order = Order::new("order-1", false, vec![LineItem::product("dl-1")], buyer());

        let first = dispatcher.on_order_completed(&order).await;
        assert!(first.subscribed());
        assert!(!pending.is_pending("order-1"));

        // Host re-fires the completion event
        let second = dispatcher.on_order_completed(&order).await;
        assert!(!second.subscribed());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_marker_cleared_on_failure() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));

        let provider = Arc::new(MockProvider::failing());
        let (dispatcher, pending) = dispatcher(config, provider.clone());

        dispatcher.record_checkout_optin("order-1");

        let order = Order::new("order-1", false, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        // Failure is absorbed, terminal either way, no retry
        assert!(!report.subscribed());
        assert_eq!(report.results.len(), 1);
        assert!(!pending.is_pending("order-1"));
    }

    #[tokio::test]
    async fn test_already_subscribed_counts_as_success() {
        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_default_campaign(Some("C0"));

        let provider = Arc::new(MockProvider::with_existing(vec![
            "jane@example.com".to_string(),
        ]));
        let (dispatcher, _) = dispatcher(config, provider.clone());

        let order = Order::new("order-1", true, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        assert!(report.subscribed());
        assert!(matches!(
            report.results[0].outcome,
            Ok(SubscribeOutcome::AlreadySubscribed)
        ));
    }

    #[tokio::test]
    async fn test_partial_failure_still_reports_subscribed() {
        // Two targets against a provider that fails only the first
        struct HalfFailing {
            calls: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl NewsletterProvider for HalfFailing {
            async fn campaigns(&self) -> HashMap<String, String> {
                HashMap::new()
            }

            async fn subscribe(
                &self,
                _buyer: &Buyer,
                campaign_id: &str,
            ) -> Result<SubscribeOutcome> {
                let mut calls = self.calls.lock().unwrap();
                calls.push(campaign_id.to_string());

                if calls.len() == 1 {
                    Err(SignupError::Provider("over quota".into()))
                } else {
                    Ok(SubscribeOutcome::Subscribed)
                }
            }

            fn name(&self) -> &str {
                "HalfFailing"
            }
        }

        let config = Arc::new(MemoryConfig::new());
        config.set_api_key(Some("secret"));
        config.set_product_campaigns("dl-1", vec!["C1".into(), "C2".into()]);

        let provider = Arc::new(HalfFailing {
            calls: Mutex::new(Vec::new()),
        });
        let pending = Arc::new(MemoryPendingStore::new());
        let dispatcher = SignupDispatcher::new(config, provider, pending);

        let order = Order::new("order-1", true, vec![LineItem::product("dl-1")], buyer());
        let report = dispatcher.on_order_completed(&order).await;

        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].outcome.is_err());
        assert!(report.results[1].outcome.is_ok());
        assert!(report.subscribed());
    }
}
