use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{AccountKey, BillingDocuments, BillingDocumentsQuery};

#[derive(Debug, Clone, Copy)]
/// Invoices, credit memos and debit memos of an account (`/v1/billing-documents`).
pub struct BillingDocumentsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> BillingDocumentsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, account_id: &AccountKey) -> Result<BillingDocuments, ZuoraError> {
        self.query(&BillingDocumentsQuery::for_account(account_id.clone()))
            .await
    }

    /// List with the optional `documentDate` / `status` filters.
    pub async fn query(
        &self,
        query: &BillingDocumentsQuery,
    ) -> Result<BillingDocuments, ZuoraError> {
        let mut url = self.client.endpoint(&["v1", "billing-documents"])?;
        url.query_pairs_mut().extend_pairs(query.to_params());
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }
}
