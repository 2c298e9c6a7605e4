use chrono::{DateTime, TimeZone, Utc};

use crate::models::domain::{Choice, Problem, SessionProblem, TestSession, User};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a standard test user
    pub fn test_user() -> User {
        test_user_with_id(1, "taro001")
    }

    pub fn test_user_with_id(id: i64, login_id: &str) -> User {
        let mut user = User::new(login_id, "Taro", "secret1");
        user.id = id;
        user
    }

    /// A problem with one right and two wrong choices; choice ids are
    /// `problem_id * 10 + n` and the first is correct.
    pub fn test_problem(id: i64, category_id: i64) -> Problem {
        let choice = |n: i64, is_correct: bool| Choice {
            id: id * 10 + n,
            problem_id: id,
            text: (id + 1 + n).to_string(),
            is_correct,
        };

        Problem {
            id,
            category_id,
            question: format!("{} + 1 = ?", id),
            hint: "Add the numbers".to_string(),
            choices: vec![choice(0, true), choice(1, false), choice(2, false)],
        }
    }

    /// Two problems for each of the seven categories.
    pub fn test_problem_bank() -> Vec<Problem> {
        (1..=7)
            .flat_map(|category_id| {
                (0..2).map(move |n| test_problem(category_id * 100 + n, category_id))
            })
            .collect()
    }

    pub fn session_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn test_session(id: i64, user_id: i64, problem_ids: &[i64]) -> TestSession {
        let mut session = TestSession::new(user_id, false);
        session.id = id;
        session.start_time = session_start();
        session.session_problems = problem_ids
            .iter()
            .enumerate()
            .map(|(i, &problem_id)| SessionProblem::unanswered(i as i64 + 1, id, problem_id))
            .collect();
        session
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.id, 1);
        assert_eq!(user.login_id, "taro001");
        assert!(user.verify_password("secret1"));
    }

    #[test]
    fn test_fixtures_problem_has_one_correct_choice() {
        let problem = test_problem(3, 1);
        assert_eq!(problem.choices.len(), 3);
        assert_eq!(problem.choices.iter().filter(|c| c.is_correct).count(), 1);
        assert!(problem.has_choice(30));
        assert!(!problem.has_choice(40));
    }

    #[test]
    fn test_fixtures_problem_bank() {
        let bank = test_problem_bank();
        assert_eq!(bank.len(), 14);
        assert_eq!(bank.iter().filter(|p| p.category_id == 7).count(), 2);
    }

    #[test]
    fn test_fixtures_session_links_problems() {
        let session = test_session(99, 1, &[5, 6]);
        assert_eq!(session.session_problems.len(), 2);
        assert!(session.session_problems.iter().all(|sp| sp.session_id == 99));
    }
}
