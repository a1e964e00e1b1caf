/*
[INPUT]:  Public endpoint paths (no auth required)
[OUTPUT]: Market metadata (currencies, fee groups, instruments, server time)
[POS]:    HTTP layer - public endpoints
[UPDATE]: When adding new public endpoints or changing response format
*/

use reqwest::Method;

use crate::http::{BitpandaClient, Result};
use crate::types::{Currency, FeeGroup, Instrument, ServerTime};

impl BitpandaClient {
    /// List all currencies with their precision
    ///
    /// GET /currencies
    pub async fn get_currencies(&self) -> Result<Vec<Currency>> {
        let builder = self.request(Method::GET, "/currencies")?;
        self.send_json(builder).await
    }

    /// Details of all general fee groups. `fee_discount_rate` and
    /// `minimum_price_value` apply when BEST fee collection is enabled.
    ///
    /// GET /fees
    pub async fn get_fee_groups(&self) -> Result<Vec<FeeGroup>> {
        let builder = self.request(Method::GET, "/fees")?;
        self.send_json(builder).await
    }

    /// List all available trade instruments
    ///
    /// GET /instruments
    pub async fn get_instruments(&self) -> Result<Vec<Instrument>> {
        let builder = self.request(Method::GET, "/instruments")?;
        self.send_json(builder).await
    }

    /// Current exchange server time, both ISO and epoch-millis
    ///
    /// GET /time
    pub async fn get_server_time(&self) -> Result<ServerTime> {
        let builder = self.request(Method::GET, "/time")?;
        self.send_json(builder).await
    }
}
