use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{CatalogPage, CatalogProduct, PageSize};

/// Default `pageSize` of catalog listings.
pub const DEFAULT_CATALOG_PAGE_SIZE: PageSize = PageSize::new_unchecked(10);

#[derive(Debug, Clone, Copy)]
/// Product catalog listing (`/v1/catalog/products`).
pub struct CatalogService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> CatalogService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    /// First page of products with their rate plans and charges.
    ///
    /// `None` uses [`DEFAULT_CATALOG_PAGE_SIZE`].
    pub async fn products(&self, page_size: Option<PageSize>) -> Result<CatalogPage, ZuoraError> {
        let page_size = page_size.unwrap_or(DEFAULT_CATALOG_PAGE_SIZE);
        let mut url = self.client.endpoint(&["v1", "catalog", "products"])?;
        url.query_pairs_mut()
            .append_pair(PageSize::FIELD, &page_size.value().to_string());
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// Follow a `nextPage` link returned by a previous page.
    pub async fn next_page(&self, next_page: &str) -> Result<CatalogPage, ZuoraError> {
        let url = self.client.relative(next_page)?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Checked)
            .await
    }

    /// Walk every page, starting with `page_size` products per page.
    pub async fn all_products(
        &self,
        page_size: Option<PageSize>,
    ) -> Result<Vec<CatalogProduct>, ZuoraError> {
        let mut page = self.products(page_size).await?;
        let mut products = std::mem::take(&mut page.products);
        while let Some(next) = page.next_page.take().filter(|next| !next.is_empty()) {
            page = self.next_page(&next).await?;
            products.append(&mut page.products);
        }
        Ok(products)
    }
}
