use reqwest::Method;

use crate::client::{Envelope, ZuoraClient, ZuoraError};
use crate::domain::{ObjectId, Payment};

#[derive(Debug, Clone, Copy)]
/// Payments (`/v1/object/payment`).
pub struct PaymentsService<'a> {
    client: &'a ZuoraClient,
}

impl<'a> PaymentsService<'a> {
    pub(crate) fn new(client: &'a ZuoraClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: &ObjectId) -> Result<Payment, ZuoraError> {
        let url = self
            .client
            .endpoint(&["v1", "object", "payment", id.as_str()])?;
        self.client
            .request_json(Method::GET, url, None, Envelope::Unchecked)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::http::fake::FakeTransport;
    use crate::client::test_support::make_client;

    use super::*;

    #[tokio::test]
    async fn get_reads_payment_object() {
        let body = r#"{"Id":"pay-1","AccountId":"acc-1","Amount":25.5,"PaymentNumber":"P-00000001","Status":"Processed","Type":"Electronic","PaymentMethodId":"pm-1"}"#;
        let transport = FakeTransport::with_response(200, body);
        let client = make_client(&transport);

        let payment = client
            .payments()
            .get(&ObjectId::new("pay-1").unwrap())
            .await
            .unwrap();

        assert_eq!(payment.amount, Some(25.5));
        assert_eq!(payment.payment_type.as_deref(), Some("Electronic"));
        assert_eq!(payment.payment_method_id.as_deref(), Some("pm-1"));
        assert_eq!(
            transport.last_request().url.as_str(),
            "https://rest.test.zuora.com/v1/object/payment/pay-1"
        );
    }
}
