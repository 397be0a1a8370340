use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{ObjectId, PaymentMethod};

#[derive(Debug, Clone, Copy)]
/// Payment methods and their snapshots (`/v1/object/payment-method*`).
pub struct PaymentMethodsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> PaymentMethodsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &ObjectId) -> Result<PaymentMethod, ZuoraError> {
        self.fetch("payment-method", id).await
    }

    /// Copy of a payment method as it was when a payment was made.
    pub async fn snapshot(&self, id: &ObjectId) -> Result<PaymentMethod, ZuoraError> {
        self.fetch("payment-method-snapshot", id).await
    }

    async fn fetch(&self, object: &str, id: &ObjectId) -> Result<PaymentMethod, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "object", object, id.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Unchecked)
            .await
    }
}
