use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{ObjectId, Product};

#[derive(Debug, Clone, Copy)]
/// Product catalog objects (`/v1/object/product`).
pub struct ProductsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> ProductsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &ObjectId) -> Result<Product, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "object", "product", id.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Unchecked)
            .await
    }
}
