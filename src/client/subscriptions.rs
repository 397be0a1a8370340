use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{
    AccountKey, Subscription, SubscriptionCancellation, SubscriptionCancellationResponse,
    SubscriptionKey, SubscriptionList, SubscriptionUpdate, SubscriptionUpdateResponse,
};

#[derive(Debug, Clone, Copy)]
/// Subscriptions (`/v1/subscriptions`).
pub struct SubscriptionsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> SubscriptionsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn by_key(&self, key: &SubscriptionKey) -> Result<Subscription, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "subscriptions", key.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// All subscriptions of an account.
    pub async fn by_account(&self, key: &AccountKey) -> Result<SubscriptionList, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "subscriptions", "accounts", key.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// Amend terms, renewal settings or rate plans of a subscription.
    pub async fn update(
        &self,
        key: &SubscriptionKey,
        update: &SubscriptionUpdate,
    ) -> Result<SubscriptionUpdateResponse, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "subscriptions", key.as_str()])?;
        let body = ZuoraClient::json_body(update)?;
        self.client
            .request_json(Method::PUT, url, Some(body), Envelope::Checked)
            .await
    }

    pub async fn cancel(
        &self,
        key: &SubscriptionKey,
        cancellation: &SubscriptionCancellation,
    ) -> Result<SubscriptionCancellationResponse, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "subscriptions", key.as_str(), "cancel"])?;
        let body = ZuoraClient::json_body(cancellation)?;
        self.client
            .request_json(Method::PUT, url, Some(body), Envelope::Checked)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::http::fake::FakeTransport;
    use crate::client::test_support::{json_body, make_client};
    use crate::domain::{CancellationPolicy, RatePlanAdd};

    use super::*;

    fn key() -> SubscriptionKey {
        SubscriptionKey::new("A-S00000001").unwrap()
    }

    #[tokio::test]
    async fn by_key_parses_subscription() {
        let body = r#"
        {
          "success": true,
          "id": "8a8082c4",
          "subscriptionNumber": "A-S00000001",
          "accountNumber": "A00000001",
          "status": "Active",
          "termType": "TERMED",
          "autoRenew": true,
          "ratePlans": [{"id": "rp-1", "productName": "Gold"}],
          "Region__c": "EU"
        }
        "#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let subscription = client.subscriptions().by_key(&key()).await.unwrap();

        assert_eq!(subscription.id, "8a8082c4");
        assert_eq!(subscription.auto_renew, Some(true));
        assert_eq!(subscription.rate_plans.len(), 1);
        assert_eq!(subscription.extra.get("Region__c"), Some(&json!("EU")));
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://rest.test.zuora.com/v1/subscriptions/A-S00000001"
        );
    }

    #[tokio::test]
    async fn by_account_lists_subscriptions() {
        let body = r#"{"success":true,"subscriptions":[{"id":"s1"},{"id":"s2"}],"nextPage":"/v1/subscriptions/accounts/A1?page=2"}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let list = client
            .subscriptions()
            .by_account(&AccountKey::new("A1").unwrap())
            .await
            .unwrap();

        assert_eq!(list.subscriptions.len(), 2);
        assert_eq!(
            list.next_page.as_deref(),
            Some("/v1/subscriptions/accounts/A1?page=2")
        );
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://rest.test.zuora.com/v1/subscriptions/accounts/A1"
        );
    }

    #[tokio::test]
    async fn update_puts_amendment() {
        let transport = FakeTransport::with_response(
            200,
            r#"{"success":true,"subscriptionId":"8a8082c4","totalDeltaMrr":10.0}"#,
        );
        let client = make_client(&transport);
        let update = SubscriptionUpdate {
            add: vec![RatePlanAdd {
                product_rate_plan_id: "prp-1".to_owned(),
                contract_effective_date: "2024-01-01".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let response = client.subscriptions().update(&key(), &update).await.unwrap();

        assert_eq!(response.subscription_id.as_deref(), Some("8a8082c4"));
        assert_eq!(response.total_delta_mrr, Some(10.0));

        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/subscriptions/A-S00000001"
        );
        assert_eq!(
            json_body(&request),
            json!({"add": [{"productRatePlanId": "prp-1", "contractEffectiveDate": "2024-01-01"}]})
        );
    }

    #[tokio::test]
    async fn cancel_puts_to_cancel_path() {
        let transport = FakeTransport::with_response(
            200,
            r#"{"success":true,"subscriptionId":"8a8082c4","cancelledDate":"2024-12-31"}"#,
        );
        let client = make_client(&transport);
        let cancellation = SubscriptionCancellation::new(CancellationPolicy::EndOfCurrentTerm);

        let response = client
            .subscriptions()
            .cancel(&key(), &cancellation)
            .await
            .unwrap();

        assert_eq!(response.cancelled_date.as_deref(), Some("2024-12-31"));

        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/subscriptions/A-S00000001/cancel"
        );
        assert_eq!(
            json_body(&request),
            json!({"cancellationPolicy": "EndOfCurrentTerm", "invoiceCollect": false})
        );
    }

    #[tokio::test]
    async fn cancel_rejected_by_zuora_is_api_error() {
        let body = r#"{"success":false,"reasons":[{"code":53210030,"message":"The subscription has been cancelled."}]}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let err = client
            .subscriptions()
            .cancel(&key(), &SubscriptionCancellation::on_date("2024-06-30"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(!err.is_retryable());
    }
}
