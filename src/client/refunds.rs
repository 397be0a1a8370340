use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{ObjectWriteResponse, RefundCreate};

#[derive(Debug, Clone, Copy)]
/// Refunds (`/v1/object/refund`).
pub struct RefundsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> RefundsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    /// Refund a payment, electronically or externally (check, cash, ...).
    pub async fn create(&self, refund: &RefundCreate) -> Result<ObjectWriteResponse, ZuoraError> {
        let url = self.client.endpoint(&["v1", "object", "refund"])?;
        let body = ZuoraClient::json_body(refund)?;
        self.client
            .request_json(Method::POST, url, Some(body), Envelope::Checked)
            .await
    }
}
