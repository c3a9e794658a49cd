use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreated {
    pub user_id: i64,
    pub phone_number: String,
}
