use serde::Serialize;

use crate::models::domain::{CategoryStats, Choice, TestSession};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSessionResponse {
    pub session_id: i64,
    pub include_integers: bool,
    pub total: usize,
}

impl From<&TestSession> for CreatedSessionResponse {
    fn from(session: &TestSession) -> Self {
        CreatedSessionResponse {
            session_id: session.id,
            include_integers: session.include_integers,
            total: session.session_problems.len(),
        }
    }
}

/// A choice as shown to the test taker; correctness is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDto {
    pub id: i64,
    pub choice_text: String,
}

impl From<&Choice> for ChoiceDto {
    fn from(choice: &Choice) -> Self {
        ChoiceDto {
            id: choice.id,
            choice_text: choice.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProblemDto {
    pub id: i64,
    pub question: String,
    pub hint: String,
    pub choices: Vec<ChoiceDto>,
    pub selected_id: Option<i64>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    pub session_id: i64,
    pub start_time: String, // JST, "YYYY-MM-DD HH:MM:SS"
    pub total: usize,
    pub correct_count: usize,
    pub category_dtos: Vec<CategoryStats>,
    pub weak_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatisticsDto {
    pub user_name: String,
    pub test_sess_dtos: Vec<SessionSummaryDto>,
}
