use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{
        statistics::{tally_category_stats, weak_categories},
        Category, CategoryStats, Problem, SessionProblem, SessionProblemRow, TestSession,
    },
};

/// Raw outcome data behind the mypage view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Every session problem of the user's sessions, newest session first and
    /// creation order within a session.
    async fn session_problem_rows(&self, user_id: i64) -> AppResult<Vec<SessionProblemRow>>;
    async fn category_stats(&self, session_id: i64) -> AppResult<Vec<CategoryStats>>;
    async fn weak_categories(&self, session_id: i64) -> AppResult<Vec<String>>;
}

pub struct MongoStatisticsRepository {
    sessions: Collection<TestSession>,
    session_problems: Collection<SessionProblem>,
    problems: Collection<Problem>,
    categories: Collection<Category>,
}

impl MongoStatisticsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            sessions: db.get_collection("test_sessions"),
            session_problems: db.get_collection("session_problems"),
            problems: db.get_collection("problems"),
            categories: db.get_collection("categories"),
        }
    }

    /// Maps each problem id to its category name. Problems or categories that
    /// no longer resolve are left out, so their rows drop out of every view.
    async fn category_names_for(&self, rows: &[SessionProblem]) -> AppResult<HashMap<i64, String>> {
        let mut problem_ids: Vec<i64> = rows.iter().map(|sp| sp.problem_id).collect();
        problem_ids.sort_unstable();
        problem_ids.dedup();

        let problems: Vec<Problem> = self
            .problems
            .find(doc! { "id": { "$in": problem_ids } })
            .await?
            .try_collect()
            .await?;

        let categories: HashMap<i64, String> = self
            .categories
            .find(doc! {})
            .await?
            .try_collect::<Vec<Category>>()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        Ok(problems
            .into_iter()
            .filter_map(|p| categories.get(&p.category_id).map(|name| (p.id, name.clone())))
            .collect())
    }
}

#[async_trait]
impl StatisticsRepository for MongoStatisticsRepository {
    async fn session_problem_rows(&self, user_id: i64) -> AppResult<Vec<SessionProblemRow>> {
        let sessions: Vec<TestSession> = self
            .sessions
            .find(doc! { "user_id": user_id })
            .sort(doc! { "id": -1 })
            .await?
            .try_collect()
            .await?;

        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let session_ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        let session_problems: Vec<SessionProblem> = self
            .session_problems
            .find(doc! { "session_id": { "$in": session_ids } })
            .sort(doc! { "session_id": -1, "id": 1 })
            .await?
            .try_collect()
            .await?;

        let start_times: HashMap<i64, _> = sessions.iter().map(|s| (s.id, s.start_time)).collect();
        let category_names = self.category_names_for(&session_problems).await?;

        Ok(session_problems
            .into_iter()
            .filter_map(|sp| {
                let category_name = category_names.get(&sp.problem_id)?.clone();
                let start_time = *start_times.get(&sp.session_id)?;
                Some(SessionProblemRow {
                    session_id: sp.session_id,
                    start_time,
                    is_correct: sp.is_correct,
                    category_name,
                })
            })
            .collect())
    }

    async fn category_stats(&self, session_id: i64) -> AppResult<Vec<CategoryStats>> {
        let session_problems: Vec<SessionProblem> = self
            .session_problems
            .find(doc! { "session_id": session_id })
            .sort(doc! { "id": 1 })
            .await?
            .try_collect()
            .await?;

        let category_names = self.category_names_for(&session_problems).await?;

        Ok(tally_category_stats(session_problems.iter().filter_map(|sp| {
            category_names
                .get(&sp.problem_id)
                .map(|name| (name.as_str(), sp.is_correct))
        })))
    }

    async fn weak_categories(&self, session_id: i64) -> AppResult<Vec<String>> {
        let stats = self.category_stats(session_id).await?;
        Ok(weak_categories(&stats))
    }
}
