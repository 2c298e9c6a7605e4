use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TestSession {
    pub id: i64,
    pub user_id: i64, // Owner; the only user allowed to read or answer
    pub include_integers: bool,
    pub start_time: DateTime<Utc>,
    #[serde(skip)]
    pub session_problems: Vec<SessionProblem>, // Stored in their own collection
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionProblem {
    pub id: i64,
    pub session_id: i64,
    pub problem_id: i64,
    pub selected_choice_id: Option<i64>,
    pub is_correct: Option<bool>,
}

impl TestSession {
    pub fn new(user_id: i64, include_integers: bool) -> Self {
        TestSession {
            id: 0,
            user_id,
            include_integers,
            start_time: Utc::now(),
            session_problems: Vec::new(),
        }
    }
}

impl SessionProblem {
    pub fn unanswered(id: i64, session_id: i64, problem_id: i64) -> Self {
        SessionProblem {
            id,
            session_id,
            problem_id,
            selected_choice_id: None,
            is_correct: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.selected_choice_id.is_some()
    }

    /// Records an answer, replacing any earlier one.
    pub fn record_answer(&mut self, choice_id: i64, is_correct: bool) {
        self.selected_choice_id = Some(choice_id);
        self.is_correct = Some(is_correct);
    }
}
