use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::http::RequestBody;
use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::zoql::query_envelope;
use crate::domain::{ActionCreate, ActionSaveResult, QueryResult, ValidationError, ZoqlQuery};

#[derive(Debug, Clone, Copy)]
/// Bulk actions (`/v1/action/*`): ZOQL queries and multi-object create.
pub struct ActionsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> ActionsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    /// Run a built query and return raw records.
    pub async fn query(&self, query: &ZoqlQuery) -> Result<QueryResult<Value>, ZuoraError> {
        self.query_as(query).await
    }

    /// Run a built query and decode each record as `T`.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        query: &ZoqlQuery,
    ) -> Result<QueryResult<T>, ZuoraError> {
        query.validate()?;
        self.send_query(&["v1", "action", "query"], query.to_envelope())
            .await
    }

    /// Run a hand-written ZOQL statement.
    pub async fn query_str(&self, zoql: &str) -> Result<QueryResult<Value>, ZuoraError> {
        if zoql.trim().is_empty() {
            return Err(ValidationError::Empty { field: "queryString" }.into());
        }
        self.send_query(&["v1", "action", "query"], query_envelope(zoql))
            .await
    }

    /// Fetch the next batch of a query that returned a `queryLocator`.
    pub async fn query_more<T: DeserializeOwned>(
        &self,
        query_locator: &str,
    ) -> Result<QueryResult<T>, ZuoraError> {
        if query_locator.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "queryLocator",
            }
            .into());
        }
        let body = serde_json::json!({ "queryLocator": query_locator.trim() }).to_string();
        self.send_query(&["v1", "action", "queryMore"], body).await
    }

    /// Create up to 50 objects of one type in a single call.
    pub async fn create(&self, payload: &ActionCreate) -> Result<Vec<ActionSaveResult>, ZuoraError> {
        let url = self.client.endpoint(&["v1", "action", "create"])?;
        let body = ZuoraClient::json_body(payload)?;
        self.client
            .request_json(Method::POST, url, Some(body), Envelope::Unchecked)
            .await
    }

    async fn send_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        envelope: String,
    ) -> Result<QueryResult<T>, ZuoraError> {
        let url = self.client.endpoint(segments)?;
        self.client
            .request_json(
                Method::POST,
                url,
                Some(RequestBody::Json(envelope)),
                Envelope::Unchecked,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::client::http::fake::FakeTransport;
    use crate::client::test_support::{json_body, make_client};

    use super::*;

    const RECORDS: &str = r#"
    {
      "records": [
        {"Id": "p1", "Name": "Gold"},
        {"Id": "p2", "Name": "Silver"}
      ],
      "size": 2,
      "done": true
    }
    "#;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct ProductRow {
        id: String,
        name: String,
    }

    #[tokio::test]
    async fn query_posts_envelope() {
        let transport = FakeTransport::with_response(200, RECORDS);
        let client = make_client(&transport);
        let query = ZoqlQuery::fields(["Id", "Name"])
            .from("Product")
            .where_eq("Name", "Gold")
            .or("Name", "Silver");

        let result = client.actions().query(&query).await.unwrap();

        assert_eq!(result.size, 2);
        assert!(result.done);
        assert_eq!(result.records[1]["Name"], json!("Silver"));

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/action/query"
        );
        assert_eq!(
            json_body(&request),
            json!({"queryString": "select Id, Name from Product where Name = 'Gold' or Name = 'Silver'"})
        );
    }

    #[tokio::test]
    async fn query_as_decodes_typed_rows() {
        let transport = FakeTransport::with_response(200, RECORDS);
        let client = make_client(&transport);
        let query = ZoqlQuery::fields(["Id", "Name"]).from("Product");

        let result = client
            .actions()
            .query_as::<ProductRow>(&query)
            .await
            .unwrap();

        assert_eq!(
            result.records,
            vec![
                ProductRow {
                    id: "p1".to_owned(),
                    name: "Gold".to_owned()
                },
                ProductRow {
                    id: "p2".to_owned(),
                    name: "Silver".to_owned()
                },
            ]
        );
    }

    #[tokio::test]
    async fn query_str_trims_statement() {
        let transport = FakeTransport::with_response(200, RECORDS);
        let client = make_client(&transport);

        client
            .actions()
            .query_str("  select Id from Account  ")
            .await
            .unwrap();

        assert_eq!(
            json_body(&transport.last_request()),
            json!({"queryString": "select Id from Account"})
        );
    }

    #[tokio::test]
    async fn empty_queries_are_rejected_without_request() {
        let transport = FakeTransport::new();
        let client = make_client(&transport);

        let err = client.actions().query_str("   ").await.unwrap_err();
        assert!(matches!(err, ZuoraError::Validation(_)));

        let err = client
            .actions()
            .query(&ZoqlQuery::fields(Vec::<String>::new()).from("Account"))
            .await
            .unwrap_err();
        assert!(matches!(err, ZuoraError::Validation(_)));

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn condition_field_with_operators_is_not_sent() {
        let transport = FakeTransport::new();
        let client = make_client(&transport);
        let query = ZoqlQuery::fields(["Id"])
            .from("Product")
            .where_eq("Name = 'a' or Id", "b");

        let err = client.actions().query(&query).await.unwrap_err();

        assert!(matches!(
            err,
            ZuoraError::Validation(ValidationError::InvalidIdentifier { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn query_more_sends_locator() {
        let transport = FakeTransport::with_response(200, RECORDS);
        let client = make_client(&transport);

        let result = client
            .actions()
            .query_more::<ProductRow>("2c92c0f8-2000")
            .await
            .unwrap();

        assert_eq!(result.records.len(), 2);
        let request = transport.last_request();
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/action/queryMore"
        );
        assert_eq!(json_body(&request), json!({"queryLocator": "2c92c0f8-2000"}));
    }

    #[tokio::test]
    async fn create_returns_per_object_results() {
        let body = r#"[{"Success":true,"Id":"c1"},{"Success":false,"Errors":[{"Code":"MISSING_REQUIRED_VALUE","Message":"LastName is required"}]}]"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);
        let payload = ActionCreate {
            object_type: "Contact".to_owned(),
            objects: vec![
                json!({"AccountId": "acc-1", "FirstName": "Ada", "LastName": "Lovelace"}),
                json!({"AccountId": "acc-1", "FirstName": "Grace"}),
            ],
        };

        let results = client.actions().create(&payload).await.unwrap();

        assert!(results[0].success);
        assert_eq!(results[0].id.as_deref(), Some("c1"));
        assert!(!results[1].success);
        assert_eq!(results[1].errors[0].code, "MISSING_REQUIRED_VALUE");

        let request = transport.last_request();
        assert_eq!(
            request.url.as_str(),
            "https://rest.test.zuora.com/v1/action/create"
        );
        assert_eq!(json_body(&request)["type"], json!("Contact"));
    }
}
