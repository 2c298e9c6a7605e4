use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Problem {
    pub id: i64,
    pub category_id: i64,
    pub question: String,
    pub hint: String,
    #[serde(default)]
    pub choices: Vec<Choice>, // Display order
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub id: i64,
    pub problem_id: i64,
    pub text: String,
    pub is_correct: bool,
}

impl Problem {
    pub fn has_choice(&self, choice_id: i64) -> bool {
        self.choices.iter().any(|c| c.id == choice_id)
    }
}
