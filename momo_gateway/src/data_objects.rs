use serde::{Deserialize, Serialize};

//--------------------------------------   TokenResponse   -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

//--------------------------------------       Party       -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyIdType {
    #[serde(rename = "MSISDN")]
    Msisdn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub party_id_type: PartyIdType,
    pub party_id: String,
}

impl Party {
    pub fn msisdn<S: Into<String>>(number: S) -> Self {
        Self { party_id_type: PartyIdType::Msisdn, party_id: number.into() }
    }
}

//--------------------------------------   PaymentParams   -----------------------------------------------------------
/// Caller-facing parameters for a request-to-pay or transfer. The wire body differs only in
/// whether the counterparty is the payer (collection) or the payee (disbursement).
#[derive(Debug, Clone)]
pub struct PaymentParams {
    pub amount: String,
    pub currency: String,
    pub external_id: String,
    pub msisdn: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentRequestBody {
    pub amount: String,
    pub currency: String,
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Party>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<Party>,
    pub payer_message: String,
    pub payee_note: String,
}

impl PaymentRequestBody {
    pub fn collection(params: &PaymentParams) -> Self {
        let message = params.message.clone().unwrap_or_default();
        Self {
            amount: params.amount.clone(),
            currency: params.currency.clone(),
            external_id: params.external_id.clone(),
            payer: Some(Party::msisdn(&params.msisdn)),
            payee: None,
            payer_message: message.clone(),
            payee_note: message,
        }
    }

    pub fn disbursement(params: &PaymentParams) -> Self {
        let message = params.message.clone().unwrap_or_default();
        Self {
            amount: params.amount.clone(),
            currency: params.currency.clone(),
            external_id: params.external_id.clone(),
            payer: None,
            payee: Some(Party::msisdn(&params.msisdn)),
            payer_message: message.clone(),
            payee_note: message,
        }
    }
}

//--------------------------------------   PaymentStatus   -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Successful,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReason {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<StatusReason>,
}

//--------------------------------------   Provisioning    -----------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewApiUser {
    pub provider_callback_host: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUserInfo {
    pub provider_callback_host: String,
    pub target_environment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyResponse {
    pub api_key: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn collection_body_carries_the_payer() {
        let params = PaymentParams {
            amount: "1000".to_string(),
            currency: "CFA".to_string(),
            external_id: "42".to_string(),
            msisdn: "+22912345678".to_string(),
            message: Some("top-up".to_string()),
        };
        let body = serde_json::to_value(PaymentRequestBody::collection(&params)).unwrap();
        assert_eq!(body["amount"], "1000");
        assert_eq!(body["externalId"], "42");
        assert_eq!(body["payer"]["partyIdType"], "MSISDN");
        assert_eq!(body["payer"]["partyId"], "+22912345678");
        assert!(body.get("payee").is_none());
        assert_eq!(body["payerMessage"], "top-up");
    }

    #[test]
    fn disbursement_body_carries_the_payee() {
        let params = PaymentParams {
            amount: "500".to_string(),
            currency: "CFA".to_string(),
            external_id: "7".to_string(),
            msisdn: "+22900000001".to_string(),
            message: None,
        };
        let body = serde_json::to_value(PaymentRequestBody::disbursement(&params)).unwrap();
        assert_eq!(body["payee"]["partyId"], "+22900000001");
        assert!(body.get("payer").is_none());
    }

    #[test]
    fn status_response_parses_reason_codes() {
        let raw = r#"{"status": "FAILED", "reason": {"code": "PAYER_NOT_FOUND", "message": "unknown msisdn"}}"#;
        let response: PaymentStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, PaymentStatus::Failed);
        assert_eq!(response.reason.unwrap().code, "PAYER_NOT_FOUND");

        let raw = r#"{"status": "PENDING"}"#;
        let response: PaymentStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, PaymentStatus::Pending);
        assert!(response.reason.is_none());
    }
}
