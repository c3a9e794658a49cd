use sente_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::Currency;

//-------------------------------------- MobileMoneyRequest  ---------------------------------------------------------
/// Inbound payload for a deposit or withdrawal initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileMoneyRequest {
    /// Decimal-string amount, e.g. "1000" or "2.5".
    pub amount: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

//--------------------------------------   PaymentReceipt    ---------------------------------------------------------
/// Returned to the initiating caller once a deposit/withdrawal reaches `Submitted`. The terminal
/// outcome is observed later through the transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: i64,
    pub reference_id: String,
}

//--------------------------------------     SendRequest     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub recipient_phone: String,
    pub amount: String,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

//--------------------------------------     SwapRequest     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub amount: String,
}

//--------------------------------------   RegisterRequest   ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

//--------------------------------------      FxRates        ---------------------------------------------------------
/// Static exchange rates, expressed as micro-USD per whole unit of each currency.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRates {
    pub hbar: Money,
    pub usdc: Money,
    pub cfa: Money,
}

impl Default for FxRates {
    fn default() -> Self {
        Self { hbar: Money::from(70_000), usdc: Money::from(1_000_000), cfa: Money::from(1_700) }
    }
}

impl FxRates {
    pub fn usd_rate(&self, currency: Currency) -> Money {
        match currency {
            Currency::Hbar => self.hbar,
            Currency::Usdc => self.usdc,
            Currency::Cfa => self.cfa,
        }
    }

    /// Converts `amount` of `from` into `to` via the USD leg. 128-bit intermediates keep the
    /// multiplication from overflowing; `None` when a rate is missing or non-positive.
    pub fn convert(&self, amount: Money, from: Currency, to: Currency) -> Option<Money> {
        let from_rate = self.usd_rate(from).value() as i128;
        let to_rate = self.usd_rate(to).value() as i128;
        if from_rate <= 0 || to_rate <= 0 {
            return None;
        }
        let converted = amount.value() as i128 * from_rate / to_rate;
        i64::try_from(converted).ok().map(Money::from)
    }
}

//--------------------------------------    BalanceSheet     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub hbar: Money,
    pub usdc: Money,
    pub cfa: Money,
    pub rates: FxRates,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_rates_convert_cfa_to_usdc() {
        let rates = FxRates::default();
        let amount = "1000".parse::<Money>().unwrap();
        let converted = rates.convert(amount, Currency::Cfa, Currency::Usdc).unwrap();
        assert_eq!(converted.to_string(), "1.7");
    }

    #[test]
    fn conversion_round_trips_through_the_usd_leg() {
        let rates = FxRates::default();
        let amount = "10".parse::<Money>().unwrap();
        let usdc = rates.convert(amount, Currency::Hbar, Currency::Usdc).unwrap();
        assert_eq!(usdc.to_string(), "0.7");
        let back = rates.convert(usdc, Currency::Usdc, Currency::Hbar).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn receipts_serialize_in_camel_case() {
        let receipt = PaymentReceipt { transaction_id: 12, reference_id: "R1".to_string() };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["transactionId"], 12);
        assert_eq!(json["referenceId"], "R1");
    }
}
