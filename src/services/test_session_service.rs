use std::sync::Arc;

use crate::{
    auth::require_session_owner,
    errors::{AppError, AppResult},
    models::{
        domain::TestSession,
        dto::response::{ChoiceDto, SessionProblemDto},
    },
    repositories::{ProblemRepository, TestSessionRepository},
};

pub const PROBLEMS_PER_CATEGORY: usize = 2;
const BASE_CATEGORY_COUNT: i64 = 6;
/// Category 7 holds the problems that involve negative integers.
const INTEGER_CATEGORY_COUNT: i64 = 7;

/// Categories a new session samples from.
pub fn session_categories(include_integers: bool) -> Vec<i64> {
    let last = if include_integers {
        INTEGER_CATEGORY_COUNT
    } else {
        BASE_CATEGORY_COUNT
    };
    (1..=last).collect()
}

pub struct TestSessionService {
    sessions: Arc<dyn TestSessionRepository>,
    problems: Arc<dyn ProblemRepository>,
}

impl TestSessionService {
    pub fn new(
        sessions: Arc<dyn TestSessionRepository>,
        problems: Arc<dyn ProblemRepository>,
    ) -> Self {
        Self { sessions, problems }
    }

    /// Starts a session for `user` with two sampled problems per category.
    ///
    /// Steps are not rolled back: if sampling or the bulk insert fails the
    /// empty session row stays behind and the error is returned.
    pub async fn create_session(&self, user_id: i64, include_integers: bool) -> AppResult<TestSession> {
        let mut session = self
            .sessions
            .create_session(TestSession::new(user_id, include_integers))
            .await
            .map_err(|e| e.context(format!("save test session for user {}", user_id)))?;

        let categories = session_categories(include_integers);
        let problems = self
            .problems
            .sample_problems(&categories, PROBLEMS_PER_CATEGORY)
            .await
            .map_err(|e| e.context(format!("sample problems for session {}", session.id)))?;

        let problem_ids: Vec<i64> = problems.iter().map(|p| p.id).collect();
        session.session_problems = self
            .sessions
            .create_session_problems(session.id, &problem_ids)
            .await
            .map_err(|e| e.context(format!("save session problems for session {}", session.id)))?;

        log::info!(
            "Created session {} for user {} with {} problems (include_integers={})",
            session.id,
            user_id,
            session.session_problems.len(),
            include_integers
        );

        Ok(session)
    }

    /// Loads a session the caller owns.
    async fn owned_session(&self, session_id: i64, caller_user_id: i64) -> AppResult<TestSession> {
        let session = self
            .sessions
            .find_session_by_id(session_id)
            .await
            .map_err(|e| e.context(format!("find session {}", session_id)))?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", session_id)))?;

        require_session_owner(&session, caller_user_id)?;
        Ok(session)
    }

    pub async fn fetch_problem_at_index(
        &self,
        session_id: i64,
        idx: i64,
        caller_user_id: i64,
    ) -> AppResult<SessionProblemDto> {
        self.owned_session(session_id, caller_user_id).await?;

        let total = self
            .sessions
            .count_session_problems(session_id)
            .await
            .map_err(|e| e.context(format!("count problems of session {}", session_id)))?;

        let position = checked_index(idx, total, session_id)?;

        let session_problem = self
            .sessions
            .find_session_problem_by_idx(session_id, position)
            .await
            .map_err(|e| e.context(format!("find problem {} of session {}", idx, session_id)))?
            .ok_or_else(|| {
                AppError::NotFound(format!("Problem {} of session {} not found", idx, session_id))
            })?;

        let problem = self
            .problems
            .find_by_id(session_problem.problem_id)
            .await
            .map_err(|e| e.context(format!("find problem {}", session_problem.problem_id)))?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Problem with id '{}' not found",
                    session_problem.problem_id
                ))
            })?;

        Ok(SessionProblemDto {
            id: session_problem.id,
            question: problem.question,
            hint: problem.hint,
            choices: problem.choices.iter().map(ChoiceDto::from).collect(),
            selected_id: session_problem.selected_choice_id,
            total,
        })
    }

    /// Records the caller's answer at `idx`. `None` leaves the row untouched.
    pub async fn submit_answer(
        &self,
        session_id: i64,
        idx: i64,
        caller_user_id: i64,
        selected_choice_id: Option<i64>,
    ) -> AppResult<()> {
        self.owned_session(session_id, caller_user_id).await?;

        let mut session_problems = self
            .sessions
            .find_session_problems(session_id)
            .await
            .map_err(|e| e.context(format!("find problems of session {}", session_id)))?;

        let position = checked_index(idx, session_problems.len(), session_id)?;

        let Some(choice_id) = selected_choice_id else {
            return Ok(());
        };

        let mut session_problem = session_problems.swap_remove(position);

        let choice = self
            .problems
            .find_choice_by_id(choice_id)
            .await
            .map_err(|e| e.context(format!("find choice {}", choice_id)))?
            .ok_or_else(|| AppError::InvalidChoice(format!("Choice with id '{}' not found", choice_id)))?;

        if choice.problem_id != session_problem.problem_id {
            return Err(AppError::InvalidChoice(format!(
                "Choice {} does not belong to problem {}",
                choice_id, session_problem.problem_id
            )));
        }

        session_problem.record_answer(choice.id, choice.is_correct);
        let session_problem_id = session_problem.id;
        self.sessions
            .update_session_problem(session_problem)
            .await
            .map_err(|e| e.context(format!("save session problem {}", session_problem_id)))?;

        log::debug!(
            "Recorded choice {} for problem {} of session {}",
            choice_id,
            idx,
            session_id
        );
        Ok(())
    }
}

fn checked_index(idx: i64, total: usize, session_id: i64) -> AppResult<usize> {
    usize::try_from(idx)
        .ok()
        .filter(|&position| position < total)
        .ok_or_else(|| {
            AppError::OutOfRange(format!(
                "Index {} outside 0..{} for session {}",
                idx, total, session_id
            ))
        })
}
