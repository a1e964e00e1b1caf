/*
[INPUT]:  Validated order variants and order-management parameters
[OUTPUT]: Order acknowledgements, order history and cancellation results
[POS]:    HTTP layer - order endpoints (require api key with TRADE scope)
[UPDATE]: When adding new order endpoints or changing order flow
*/

use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::http::{AccountClient, Error, Result};
use crate::types::{
    Order, OrderHistory, OrderUpdated, OrderWithTrades, OrdersQuery, Scope, SuccessfulOrder,
};

/// Upper limit on order ids accepted by a single close request.
const MAX_CLOSE_IDS: usize = 20;

impl AccountClient {
    /// Submit a new order. The order's flat wire map becomes the request
    /// body; the exchange's acknowledgement comes back as a
    /// [`SuccessfulOrder`].
    ///
    /// POST /account/orders
    pub async fn create_order(&self, order: &Order) -> Result<SuccessfulOrder> {
        let params = order.to_params()?;
        let builder = self
            .request(Method::POST, "/orders", Scope::Trade)?
            .json(&Value::Object(params));
        self.send_json(builder).await
    }

    /// Paginated report of orders, currently open ones by default.
    /// Filters widen it to cancelled/rejected or filled-inactive history.
    ///
    /// GET /account/orders
    pub async fn get_orders(&self, query: &OrdersQuery) -> Result<OrderHistory> {
        let builder = self
            .request(Method::GET, "/orders", Scope::Read)?
            .query(&query.query_params()?);
        self.send_json(builder).await
    }

    /// Information about one order together with its fills
    ///
    /// GET /account/orders/{id}
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderWithTrades> {
        let path = format!("/orders/{order_id}");
        let builder = self.request(Method::GET, &path, Scope::Read)?;
        self.send_json(builder).await
    }

    /// Replace the open amount of an order with a new positive value
    ///
    /// PUT /account/orders/{id}
    pub async fn update_order_by_id(&self, order_id: Uuid, amount: Decimal) -> Result<OrderUpdated> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation("amount must be positive".into()));
        }
        let path = format!("/orders/{order_id}");
        let builder = self
            .request(Method::PUT, &path, Scope::Trade)?
            .json(&json!({ "amount": amount.to_string() }));
        self.send_json(builder).await
    }

    /// Submit a close request for open orders; returns the ids submitted
    /// for cancellation.
    ///
    /// Accepts either an instrument filter or a set of up to 20 order ids,
    /// never both; with neither, every open order of the account is closed.
    /// Orders being filled are closed best-effort and may already be
    /// partially or fully filled.
    ///
    /// DELETE /account/orders
    pub async fn close_all_orders(
        &self,
        instrument_code: Option<&str>,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        if instrument_code.is_some() && !ids.is_empty() {
            return Err(Error::Validation(
                "instrument_code and ids are mutually exclusive".into(),
            ));
        }
        if ids.len() > MAX_CLOSE_IDS {
            return Err(Error::Validation(format!(
                "at most {MAX_CLOSE_IDS} order ids can be closed at a time"
            )));
        }

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(code) = instrument_code {
            params.push(("instrument_code", code.to_string()));
        }
        if !ids.is_empty() {
            let joined = ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("ids", joined));
        }

        let builder = self
            .request(Method::DELETE, "/orders", Scope::Trade)?
            .query(&params);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{AccountClient, BitpandaClient, ClientConfig, Credentials, Error};
    use crate::types::{Order, OrderType, OrdersQuery, Scope, Side, TimeInForce};
    use uuid::Uuid;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AccountClient {
        let client =
            BitpandaClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
                .expect("client init");
        AccountClient::with_client(client, Credentials::new("test-api-key", Scope::Trade))
    }

    fn limit_order() -> Order {
        Order::builder(
            "BTC_EUR",
            Side::Buy,
            OrderType::Limit,
            "1.5".parse().expect("amount"),
        )
        .price("30000".parse().expect("price"))
        .time_in_force(TimeInForce::GoodTillCancelled)
        .build()
        .expect("valid order")
    }

    #[tokio::test]
    async fn test_create_order_posts_flat_map() {
        let server = MockServer::start().await;
        let expected_body = serde_json::json!({
            "instrument_code": "BTC_EUR",
            "side": "BUY",
            "type": "LIMIT",
            "amount": "1.5",
            "price": "30000",
            "time_in_force": "GOOD_TILL_CANCELLED"
        });
        let mock_response = r#"{
            "order_id": "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10",
            "account_id": "379a12c0-4560-11e9-82fe-2b25c6f7d123",
            "instrument_code": "BTC_EUR",
            "side": "BUY",
            "type": "LIMIT",
            "amount": "1.5",
            "filled_amount": "0.0",
            "price": "30000",
            "time_in_force": "GOOD_TILL_CANCELLED",
            "time": "2021-03-02T10:00:00Z"
        }"#;

        let _mock = Mock::given(method("POST"))
            .and(path("/account/orders"))
            .and(body_json(&expected_body))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ack = client
            .create_order(&limit_order())
            .await
            .expect("create_order failed");

        assert_eq!(ack.instrument_code, "BTC_EUR");
        assert_eq!(ack.filled_amount, "0".parse().expect("filled"));
        assert_eq!(
            ack.order_id.to_string(),
            "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10"
        );
    }

    #[tokio::test]
    async fn test_get_order_returns_order_and_trades() {
        let server = MockServer::start().await;
        let order_id = "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10";
        let mock_response = r#"{
            "order": {
                "order_id": "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10",
                "account_id": "379a12c0-4560-11e9-82fe-2b25c6f7d123",
                "instrument_code": "BTC_EUR",
                "side": "BUY",
                "type": "LIMIT",
                "amount": "1.5",
                "filled_amount": "1.5",
                "price": "30000",
                "time_in_force": "GOOD_TILL_CANCELLED",
                "time": "2021-03-02T10:00:00Z"
            },
            "trades": [
                {
                    "fee": {
                        "fee_amount": "0.0014",
                        "fee_currency": "BTC",
                        "fee_percentage": "0.1",
                        "fee_type": "TAKER"
                    },
                    "trade": {
                        "trade_id": "56a54b1a-3da4-47fd-a14d-7e1d30e5b85b",
                        "order_id": "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10",
                        "account_id": "379a12c0-4560-11e9-82fe-2b25c6f7d123",
                        "amount": "1.5",
                        "side": "BUY",
                        "instrument_code": "BTC_EUR",
                        "price": "30000",
                        "time": "2021-03-02T10:00:05Z",
                        "sequence": 123456
                    }
                }
            ]
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path(format!("/account/orders/{order_id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .get_order(order_id.parse().expect("uuid"))
            .await
            .expect("get_order failed");

        assert_eq!(result.order.filled_amount, "1.5".parse().expect("filled"));
        assert_eq!(result.trades.len(), 1);
        let entry = &result.trades[0];
        assert_eq!(entry.trade.sequence, 123_456);
        assert_eq!(
            entry.fee.as_ref().expect("fee").fee_currency,
            "BTC"
        );
    }

    #[tokio::test]
    async fn test_get_orders_applies_filters() {
        let server = MockServer::start().await;
        let mock_response = r#"{"order_history": [], "max_page_size": 50}"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/account/orders"))
            .and(query_param("instrument_code", "BTC_EUR"))
            .and(query_param("with_cancelled_and_rejected", "true"))
            .and(query_param("max_page_size", "50"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = OrdersQuery {
            instrument_code: Some("BTC_EUR".into()),
            with_cancelled_and_rejected: Some(true),
            max_page_size: Some(50),
            ..OrdersQuery::default()
        };
        let history = client.get_orders(&query).await.expect("get_orders failed");

        assert!(history.order_history.is_empty());
        assert_eq!(history.max_page_size, Some(50));
    }

    #[tokio::test]
    async fn test_update_order_by_id() {
        let server = MockServer::start().await;
        let order_id = "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10";
        let mock_response = r#"{
            "order_id": "6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10",
            "amount": "2.0",
            "sequence": 42
        }"#;

        let _mock = Mock::given(method("PUT"))
            .and(path(format!("/account/orders/{order_id}")))
            .and(body_json(&serde_json::json!({"amount": "2.0"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let updated = client
            .update_order_by_id(order_id.parse().expect("uuid"), "2.0".parse().expect("amount"))
            .await
            .expect("update failed");

        assert_eq!(updated.amount, "2.0".parse().expect("amount"));
        assert_eq!(updated.sequence, Some(42));
    }

    #[tokio::test]
    async fn test_update_order_rejects_non_positive_amount() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let err = client
            .update_order_by_id(Uuid::new_v4(), "0".parse().expect("amount"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_close_all_orders_by_instrument() {
        let server = MockServer::start().await;
        let mock_response = r#"["6c3e7b9a-31e0-4b9c-9f31-2b0cfc2f0e10"]"#;

        let _mock = Mock::given(method("DELETE"))
            .and(path("/account/orders"))
            .and(query_param("instrument_code", "BTC_EUR"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let closed = client
            .close_all_orders(Some("BTC_EUR"), &[])
            .await
            .expect("close failed");

        assert_eq!(closed.len(), 1);
    }

    #[tokio::test]
    async fn test_close_all_orders_rejects_both_filters_before_any_request() {
        let server = MockServer::start().await;
        // no request must reach the server when validation fails
        let _mock = Mock::given(method("DELETE"))
            .and(path("/account/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .close_all_orders(Some("BTC_EUR"), &[Uuid::new_v4(), Uuid::new_v4()])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_close_all_orders_caps_ids_at_twenty() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let ids: Vec<Uuid> = (0..21).map(|_| Uuid::new_v4()).collect();
        let err = client.close_all_orders(None, &ids).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
