use serde::Deserialize;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub user_name: String,

    #[validate(length(min = 6, max = 16), custom(function = "validate_alphanumeric"))]
    pub login_id: String,

    #[validate(length(min = 6, max = 16), custom(function = "validate_alphanumeric"))]
    pub password1: String,

    #[validate(length(min = 6, max = 16), custom(function = "validate_alphanumeric"))]
    pub password2: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub login_id: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionParams {
    #[serde(default)]
    pub include_integers: bool,
}

/// A missing or null `selectedChoiceId` leaves the answer untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[serde(default)]
    pub selected_choice_id: Option<i64>,
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}
