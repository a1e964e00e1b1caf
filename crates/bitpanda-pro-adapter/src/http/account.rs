/*
[INPUT]:  Bearer-authenticated requests with query/body parameters
[OUTPUT]: Account state (balances, transfer history, fee settings)
[POS]:    HTTP layer - account endpoints (require api key)
[UPDATE]: When adding new account endpoints or changing query parameters
*/

use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use crate::http::{AccountClient, Result};
use crate::types::{
    Account, AccountFees, CryptoWithdraw, DepositAddress, DepositHistory, FiatCurrency,
    FiatWithdraw, Scope, SepaDepositInfo, TransferQuery, WithdrawCryptoBody, WithdrawFiatBody,
    WithdrawalHistory,
};

impl AccountClient {
    /// Balance details for the account the api key belongs to
    ///
    /// GET /account/balances
    pub async fn get_balances(&self) -> Result<Account> {
        let builder = self.request(Method::GET, "/balances", Scope::Read)?;
        self.send_json(builder).await
    }

    /// Create a new deposit address for the given crypto currency code
    ///
    /// POST /account/deposit/crypto
    pub async fn deposit_crypto(&self, currency_code: &str) -> Result<DepositAddress> {
        let builder = self
            .request(Method::POST, "/deposit/crypto", Scope::Withdraw)?
            .json(&json!({ "currency": currency_code }));
        self.send_json(builder).await
    }

    /// Existing deposit address for the given crypto currency code.
    /// Fiat codes are rejected by the exchange.
    ///
    /// GET /account/deposit/crypto/{code}
    pub async fn get_deposit_address(&self, currency_code: &str) -> Result<DepositAddress> {
        let path = format!("/deposit/crypto/{currency_code}");
        let builder = self.request(Method::GET, &path, Scope::Withdraw)?;
        self.send_json(builder).await
    }

    /// SEPA transfer details for fiat deposits
    ///
    /// GET /account/deposit/fiat/{code}
    pub async fn get_deposit_fiat(&self, fiat: FiatCurrency) -> Result<SepaDepositInfo> {
        let path = format!("/deposit/fiat/{}", fiat.code());
        let builder = self.request(Method::GET, &path, Scope::Read)?;
        self.send_json(builder).await
    }

    /// Initiate a crypto withdrawal. Only crypto currencies are accepted
    /// on this endpoint.
    ///
    /// POST /account/withdraw/crypto
    pub async fn withdraw_crypto(&self, body: &WithdrawCryptoBody) -> Result<CryptoWithdraw> {
        let builder = self
            .request(Method::POST, "/withdraw/crypto", Scope::Withdraw)?
            .json(body);
        self.send_json(builder).await
    }

    /// Initiate a fiat withdrawal to a registered payout account; returns
    /// the transaction id of the submitted withdrawal
    ///
    /// POST /account/withdraw/fiat
    pub async fn withdraw_fiat(&self, body: &WithdrawFiatBody) -> Result<Uuid> {
        let builder = self
            .request(Method::POST, "/withdraw/fiat", Scope::Withdraw)?
            .json(body);
        let response: FiatWithdraw = self.send_json(builder).await?;
        Ok(response.transaction_id)
    }

    /// Paginated report of past cleared deposits, newest first
    ///
    /// GET /account/deposits
    pub async fn get_deposits(&self, query: &TransferQuery) -> Result<DepositHistory> {
        let builder = self
            .request(Method::GET, "/deposits", Scope::Read)?
            .query(&query.query_params()?);
        self.send_json(builder).await
    }

    /// Like [`get_deposits`](Self::get_deposits), restricted to transfers
    /// from Bitpanda
    ///
    /// GET /account/deposits/bitpanda
    pub async fn get_deposits_from_bitpanda(&self, query: &TransferQuery) -> Result<DepositHistory> {
        let builder = self
            .request(Method::GET, "/deposits/bitpanda", Scope::Read)?
            .query(&query.query_params()?);
        self.send_json(builder).await
    }

    /// Paginated report of past cleared withdrawals, newest first
    ///
    /// GET /account/withdrawals
    pub async fn get_withdrawals(&self, query: &TransferQuery) -> Result<WithdrawalHistory> {
        let builder = self
            .request(Method::GET, "/withdrawals", Scope::Read)?
            .query(&query.query_params()?);
        self.send_json(builder).await
    }

    /// Like [`get_withdrawals`](Self::get_withdrawals), restricted to
    /// transfers from Bitpanda
    ///
    /// GET /account/withdrawals/bitpanda
    pub async fn get_withdrawals_from_bitpanda(
        &self,
        query: &TransferQuery,
    ) -> Result<WithdrawalHistory> {
        let builder = self
            .request(Method::GET, "/withdrawals/bitpanda", Scope::Read)?
            .query(&query.query_params()?);
        self.send_json(builder).await
    }

    /// Fee tiers, running trading volume, active tier and the BEST fee
    /// collection settings for the account
    ///
    /// GET /account/fees
    pub async fn get_fees(&self) -> Result<AccountFees> {
        let builder = self.request(Method::GET, "/fees", Scope::Read)?;
        self.send_json(builder).await
    }

    /// Enable or disable fee collection in BEST. With the toggle enabled
    /// the group's `fee_discount_rate` is deducted and `minimum_price_value`
    /// bounds the BEST price used for the calculation.
    ///
    /// POST /account/fees
    pub async fn toggle_best_fee_collection(&self, collect_fees_in_best: bool) -> Result<AccountFees> {
        let builder = self
            .request(Method::POST, "/fees", Scope::Trade)?
            .json(&json!({ "collect_fees_in_best": collect_fees_in_best }));
        self.send_json(builder).await
    }
}
