use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{SessionProblem, TestSession},
};

const SESSIONS_SEQUENCE: &str = "test_sessions";
const SESSION_PROBLEMS_SEQUENCE: &str = "session_problems";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestSessionRepository: Send + Sync {
    /// Persists a new session and returns it with its assigned id.
    async fn create_session(&self, session: TestSession) -> AppResult<TestSession>;
    /// Creates one unanswered row per problem id, ids ascending in input order.
    async fn create_session_problems(
        &self,
        session_id: i64,
        problem_ids: &[i64],
    ) -> AppResult<Vec<SessionProblem>>;
    async fn find_session_by_id(&self, id: i64) -> AppResult<Option<TestSession>>;
    async fn count_session_problems(&self, session_id: i64) -> AppResult<usize>;
    /// The row at 0-based position `idx` when ordered by id.
    async fn find_session_problem_by_idx(
        &self,
        session_id: i64,
        idx: usize,
    ) -> AppResult<Option<SessionProblem>>;
    async fn find_session_problems(&self, session_id: i64) -> AppResult<Vec<SessionProblem>>;
    async fn update_session_problem(&self, session_problem: SessionProblem) -> AppResult<SessionProblem>;
}

pub struct MongoTestSessionRepository {
    db: Database,
    sessions: Collection<TestSession>,
    session_problems: Collection<SessionProblem>,
}

impl MongoTestSessionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            sessions: db.get_collection("test_sessions"),
            session_problems: db.get_collection("session_problems"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for test_sessions and session_problems collections");

        let session_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let session_user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "id": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_recent".to_string())
                    .build(),
            )
            .build();

        let problem_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let problem_order_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_order".to_string())
                    .build(),
            )
            .build();

        self.sessions.create_index(session_id_index).await?;
        self.sessions.create_index(session_user_index).await?;
        self.session_problems.create_index(problem_id_index).await?;
        self.session_problems.create_index(problem_order_index).await?;

        log::info!("Successfully created indexes for test_sessions and session_problems collections");
        Ok(())
    }
}

#[async_trait]
impl TestSessionRepository for MongoTestSessionRepository {
    async fn create_session(&self, mut session: TestSession) -> AppResult<TestSession> {
        session.id = self.db.next_id(SESSIONS_SEQUENCE).await?;
        self.sessions.insert_one(&session).await?;
        Ok(session)
    }

    async fn create_session_problems(
        &self,
        session_id: i64,
        problem_ids: &[i64],
    ) -> AppResult<Vec<SessionProblem>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }

        let first_id = self
            .db
            .reserve_ids(SESSION_PROBLEMS_SEQUENCE, problem_ids.len() as i64)
            .await?;

        let rows: Vec<SessionProblem> = problem_ids
            .iter()
            .enumerate()
            .map(|(offset, &problem_id)| {
                SessionProblem::unanswered(first_id + offset as i64, session_id, problem_id)
            })
            .collect();

        self.session_problems.insert_many(&rows).await?;
        Ok(rows)
    }

    async fn find_session_by_id(&self, id: i64) -> AppResult<Option<TestSession>> {
        let session = self.sessions.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn count_session_problems(&self, session_id: i64) -> AppResult<usize> {
        let count = self
            .session_problems
            .count_documents(doc! { "session_id": session_id })
            .await?;
        Ok(count as usize)
    }

    async fn find_session_problem_by_idx(
        &self,
        session_id: i64,
        idx: usize,
    ) -> AppResult<Option<SessionProblem>> {
        let find_options = FindOptions::builder()
            .sort(Some(doc! { "id": 1 }))
            .skip(Some(idx as u64))
            .limit(Some(1))
            .build();

        let mut items: Vec<SessionProblem> = self
            .session_problems
            .find(doc! { "session_id": session_id })
            .with_options(find_options)
            .await?
            .try_collect()
            .await?;

        Ok(items.pop())
    }

    async fn find_session_problems(&self, session_id: i64) -> AppResult<Vec<SessionProblem>> {
        let items = self
            .session_problems
            .find(doc! { "session_id": session_id })
            .sort(doc! { "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(items)
    }

    async fn update_session_problem(&self, session_problem: SessionProblem) -> AppResult<SessionProblem> {
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .session_problems
            .replace_one(doc! { "id": session_problem.id }, &session_problem)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Session problem with id '{}' not found",
                session_problem.id
            )));
        }

        Ok(session_problem)
    }
}
