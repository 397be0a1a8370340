use reqwest::Method;
use serde::Serialize;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{
    Account, AccountDetail, AccountKey, AccountSummary, ObjectId, ObjectWriteResponse,
};

#[derive(Debug, Clone, Copy)]
/// Customer accounts (`/v1/accounts`, `/v1/object/account`).
pub struct AccountsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> AccountsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    /// Basic information, contacts and billing settings of an account.
    pub async fn get(&self, key: &AccountKey) -> Result<AccountDetail, ZuoraError> {
        let url = self.client.endpoint(&["v1", "accounts", key.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// Account with its latest subscriptions, invoices, payments and usage.
    pub async fn summary(&self, key: &AccountKey) -> Result<AccountSummary, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "accounts", key.as_str(), "summary"])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// CRUD read of the `Account` object, including custom fields.
    pub async fn object_get(&self, id: &ObjectId) -> Result<Account, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "object", "account", id.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Unchecked)
            .await
    }

    /// CRUD update of the `Account` object. `payload` holds the PascalCase
    /// fields to change.
    pub async fn object_update<P>(
        &self,
        id: &ObjectId,
        payload: &P,
    ) -> Result<ObjectWriteResponse, ZuoraError>
    where
        P: Serialize + ?Sized,
    {
        let url = self
            .client
            .endpoint(&["v1", "object", "account", id.as_str()])?;
        let body = ZuoraClient::json_body(payload)?;
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

    use super::*;

    #[tokio::test]
    async fn get_parses_account_detail() {
        let body = r#"
        {
          "success": true,
          "basicInfo": {
            "id": "2c92c0f8",
            "name": "Acme",
            "accountNumber": "A00000001",
            "status": "Active",
            "balance": 10.5,
            "currency": "USD",
            "Region__c": "EU"
          },
          "billToContact": {"firstName": "Ada", "lastName": "Lovelace", "country": "UK"},
          "metrics": {"balance": 10.5}
        }
        "#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let account = client
            .accounts()
            .get(&AccountKey::new("A00000001").unwrap())
            .await
            .unwrap();

        assert_eq!(account.basic_info.id, "2c92c0f8");
        assert_eq!(account.basic_info.balance, Some(10.5));
        assert_eq!(
            account.basic_info.extra.get("Region__c"),
            Some(&json!("EU"))
        );
        assert_eq!(
            account.bill_to_contact.unwrap().first_name.as_deref(),
            Some("Ada")
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/accounts/A00000001"
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn summary_uses_summary_path() {
        let body = r#"{"success":true,"basicInfo":{"id":"2c92"},"subscriptions":[{"id":"s1"}],"invoices":[],"payments":[],"usage":[]}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let summary = client
            .accounts()
            .summary(&AccountKey::new("A00000001").unwrap())
            .await
            .unwrap();

        assert_eq!(summary.subscriptions.len(), 1);
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://rest.test.zuora.com/v1/accounts/A00000001/summary"
        );
    }

    #[tokio::test]
    async fn object_get_skips_envelope_check() {
        // CRUD reads have no success flag; a custom field named like it must not trip the check.
        let body = r#"{"Id":"2c92","Name":"Acme","Success":false}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let account = client
            .accounts()
            .object_get(&ObjectId::new("2c92").unwrap())
            .await
            .unwrap();

        assert_eq!(account.id, "2c92");
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://rest.test.zuora.com/v1/object/account/2c92"
        );
    }

    #[tokio::test]
    async fn object_update_puts_payload() {
        let transport = FakeTransport::with_response(200, r#"{"Success":true,"Id":"2c92"}"#);
        let client = make_client(&transport);

        let response = client
            .accounts()
            .object_update(
                &ObjectId::new("2c92").unwrap(),
                &json!({"Name": "Acme Ltd", "Region__c": "EU"}),
            )
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.id, "2c92");

        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(json_body(&request), json!({"Name": "Acme Ltd", "Region__c": "EU"}));
    }

    #[tokio::test]
    async fn object_update_failure_is_api_error() {
        let body = r#"{"Success":false,"Errors":[{"Code":"INVALID_VALUE","Message":"Invalid value for Name"}]}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let err = client
            .accounts()
            .object_update(&ObjectId::new("2c92").unwrap(), &json!({"Name": ""}))
            .await
            .unwrap_err();

        match err {
            ZuoraError::Api {
                error: classified, ..
            } => {
                assert_eq!(classified.status, 400);
                assert_eq!(classified.message, "INVALID_VALUE: Invalid value for Name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
