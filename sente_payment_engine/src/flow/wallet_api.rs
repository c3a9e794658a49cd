use log::*;

use crate::{
    db_types::{Transaction, UserProfile, Wallet},
    flow::{
        errors::PaymentFlowError,
        objects::{BalanceSheet, FxRates, RegisterRequest, SendRequest, SwapRequest},
        parse_amount,
    },
    helpers::normalize_msisdn,
    traits::LedgerDatabase,
};

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;
const DEFAULT_LANGUAGE: &str = "fr";

/// Ledger-side operations that never touch the provider: balances, history, wallet-to-wallet
/// sends, swaps between the three balances, and account registration.
#[derive(Debug, Clone)]
pub struct WalletApi<B> {
    db: B,
    rates: FxRates,
}

impl<B: LedgerDatabase> WalletApi<B> {
    pub fn new(db: B, rates: FxRates) -> Self {
        Self { db, rates }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<(UserProfile, Wallet), PaymentFlowError> {
        let msisdn = normalize_msisdn(&request.phone_number).ok_or_else(|| {
            PaymentFlowError::ValidationError(format!("{} is not a valid phone number", request.phone_number))
        })?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(PaymentFlowError::ValidationError("A name is required".to_string()));
        }
        let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let (user, wallet) = self.db.create_account(&msisdn, name, language).await?;
        info!("🧑️ Registered user #{} ({})", user.id, user.phone_number);
        Ok((user, wallet))
    }

    pub async fn balances(&self, user_id: i64) -> Result<BalanceSheet, PaymentFlowError> {
        let wallet = self.db.fetch_wallet(user_id).await?.ok_or(PaymentFlowError::WalletNotFound(user_id))?;
        Ok(BalanceSheet {
            hbar: wallet.hbar_balance,
            usdc: wallet.usdc_balance,
            cfa: wallet.cfa_balance,
            rates: self.rates,
        })
    }

    pub async fn history(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<Transaction>, PaymentFlowError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
        Ok(self.db.fetch_history(user_id, limit).await?)
    }

    pub async fn send(&self, user_id: i64, request: SendRequest) -> Result<Transaction, PaymentFlowError> {
        let amount = parse_amount(&request.amount)?;
        let msisdn = normalize_msisdn(&request.recipient_phone).ok_or_else(|| {
            PaymentFlowError::ValidationError(format!("{} is not a valid phone number", request.recipient_phone))
        })?;
        let row = self.db.transfer_between(user_id, &msisdn, amount, request.currency, request.note).await?;
        info!("🧑️ User {user_id} sent {amount} {} to {msisdn}", request.currency);
        Ok(row)
    }

    pub async fn swap(&self, user_id: i64, request: SwapRequest) -> Result<Transaction, PaymentFlowError> {
        let amount = parse_amount(&request.amount)?;
        if request.from_currency == request.to_currency {
            return Err(PaymentFlowError::ValidationError("Cannot swap a currency for itself".to_string()));
        }
        let converted = self
            .rates
            .convert(amount, request.from_currency, request.to_currency)
            .ok_or_else(|| PaymentFlowError::ValidationError("No exchange rate is configured for this pair".to_string()))?;
        if !converted.is_positive() {
            return Err(PaymentFlowError::ValidationError("Amount is too small to swap".to_string()));
        }
        let note = format!("{amount} {} -> {converted} {}", request.from_currency, request.to_currency);
        let row = self
            .db
            .swap_within(user_id, request.from_currency, request.to_currency, amount, converted, Some(note))
            .await?;
        info!("🧑️ User {user_id} swapped {amount} {} for {converted} {}", request.from_currency, request.to_currency);
        Ok(row)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
