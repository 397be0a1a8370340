use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{Invoice, InvoiceFiles, ObjectId, PageSize};

/// Default `pageSize` of invoice file listings.
pub const DEFAULT_INVOICE_FILES_PAGE_SIZE: PageSize = PageSize::new_unchecked(20);

#[derive(Debug, Clone, Copy)]
/// Invoices (`/v1/object/invoice`, `/v1/invoices`).
pub struct InvoicesService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> InvoicesService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &ObjectId) -> Result<Invoice, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "object", "invoice", id.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Unchecked)
            .await
    }

    /// Generated PDF files of an invoice.
    ///
    /// `None` uses [`DEFAULT_INVOICE_FILES_PAGE_SIZE`].
    pub async fn files(
        &self,
        id: &ObjectId,
        page_size: Option<PageSize>,
    ) -> Result<InvoiceFiles, ZuoraError> {
        let page_size = page_size.unwrap_or(DEFAULT_INVOICE_FILES_PAGE_SIZE);
        let mut url = self
            .client
            .endpoint(&["v1", "invoices", id.as_str(), "files"])?;
        url.query_pairs_mut()
            .append_pair(PageSize::FIELD, &page_size.value().to_string());
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }
}
