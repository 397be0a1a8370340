use reqwest::Method;

use crate::client::{ZuoraClient, ZuoraError};
use crate::domain::{DescribedObject, ObjectName};

#[derive(Debug, Clone, Copy)]
/// Object schema inspection (`/v1/describe`). The endpoint answers in XML.
pub struct DescribeService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> DescribeService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    /// Fields of a Zuora object, including tenant custom fields.
    pub async fn object(&self, name: &ObjectName) -> Result<DescribedObject, ZuoraError> {
        let url = self.client.endpoint(&["v1", "describe", name.as_str()])?;
        let body = self.client.request_text(Method::GET, url).await?;
        crate::transport::decode_describe_xml_response(&body)
            .map_err(|err| ZuoraError::parse(err, &body))
    }
}
