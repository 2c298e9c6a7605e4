#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use mathquiz_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        statistics::{tally_category_stats, weak_categories},
        Category, CategoryStats, Choice, Problem, SessionProblem, SessionProblemRow, TestSession,
        User,
    },
    repositories::{ProblemRepository, StatisticsRepository, TestSessionRepository, UserRepository},
};

pub const CATEGORY_NAMES: [&str; 7] = ["Add", "Sub", "Mul", "Div", "Frac", "Dec", "Int"];

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    problems: Vec<Problem>,
    sessions: Vec<TestSession>,
    session_problems: Vec<SessionProblem>,
    counters: HashMap<&'static str, i64>,
}

impl State {
    fn next_id(&mut self, sequence: &'static str) -> i64 {
        let counter = self.counters.entry(sequence).or_insert(0);
        *counter += 1;
        *counter
    }

    fn category_name_of(&self, problem_id: i64) -> Option<String> {
        let problem = self.problems.iter().find(|p| p.id == problem_id)?;
        self.categories
            .iter()
            .find(|c| c.id == problem.category_id)
            .map(|c| c.name.clone())
    }
}

/// Backs all four repositories with one in-memory state so joins see the
/// same rows the session flow wrote.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with seven categories holding `per_category` problems each.
    /// Problem `n` of category `c` has id `c * 100 + n`; its first choice
    /// (id `problem_id * 10`) is the correct one.
    pub async fn seeded(per_category: i64) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write().await;
            for (index, name) in CATEGORY_NAMES.iter().enumerate() {
                let category_id = index as i64 + 1;
                state.categories.push(Category {
                    id: category_id,
                    name: name.to_string(),
                });
                for n in 0..per_category {
                    let problem_id = category_id * 100 + n;
                    state.problems.push(Problem {
                        id: problem_id,
                        category_id,
                        question: format!("{} problem {}", name, n),
                        hint: format!("{} hint", name),
                        choices: (0..3)
                            .map(|c| Choice {
                                id: problem_id * 10 + c,
                                problem_id,
                                text: format!("answer {}", c),
                                is_correct: c == 0,
                            })
                            .collect(),
                    });
                }
            }
        }
        store
    }

    pub async fn session_problems_of(&self, session_id: i64) -> Vec<SessionProblem> {
        let state = self.state.read().await;
        state
            .session_problems
            .iter()
            .filter(|sp| sp.session_id == session_id)
            .cloned()
            .collect()
    }

    pub async fn category_of(&self, problem_id: i64) -> Option<i64> {
        let state = self.state.read().await;
        state
            .problems
            .iter()
            .find(|p| p.id == problem_id)
            .map(|p| p.category_id)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.login_id == user.login_id) {
            return Err(AppError::AlreadyExists(format!(
                "User with login id '{}' already exists",
                user.login_id
            )));
        }
        user.id = state.next_id("users");
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_login_id(&self, login_id: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.login_id == login_id).cloned())
    }
}

#[async_trait]
impl ProblemRepository for InMemoryStore {
    async fn sample_problems(&self, category_ids: &[i64], per_category: usize) -> AppResult<Vec<Problem>> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        let mut sampled = Vec::new();
        for category_id in category_ids {
            for problem in state
                .problems
                .iter()
                .filter(|p| p.category_id == *category_id)
                .take(per_category)
            {
                if seen.insert(problem.id) {
                    sampled.push(problem.clone());
                }
            }
        }
        Ok(sampled)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Problem>> {
        let state = self.state.read().await;
        Ok(state.problems.iter().find(|p| p.id == id).cloned())
    }

    async fn find_choice_by_id(&self, choice_id: i64) -> AppResult<Option<Choice>> {
        let state = self.state.read().await;
        Ok(state
            .problems
            .iter()
            .flat_map(|p| p.choices.iter())
            .find(|c| c.id == choice_id)
            .cloned())
    }
}

#[async_trait]
impl TestSessionRepository for InMemoryStore {
    async fn create_session(&self, mut session: TestSession) -> AppResult<TestSession> {
        let mut state = self.state.write().await;
        session.id = state.next_id("test_sessions");
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn create_session_problems(
        &self,
        session_id: i64,
        problem_ids: &[i64],
    ) -> AppResult<Vec<SessionProblem>> {
        let mut state = self.state.write().await;
        let mut rows = Vec::with_capacity(problem_ids.len());
        for &problem_id in problem_ids {
            let id = state.next_id("session_problems");
            rows.push(SessionProblem::unanswered(id, session_id, problem_id));
        }
        state.session_problems.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn find_session_by_id(&self, id: i64) -> AppResult<Option<TestSession>> {
        let state = self.state.read().await;
        Ok(state.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn count_session_problems(&self, session_id: i64) -> AppResult<usize> {
        Ok(self.session_problems_of(session_id).await.len())
    }

    async fn find_session_problem_by_idx(
        &self,
        session_id: i64,
        idx: usize,
    ) -> AppResult<Option<SessionProblem>> {
        Ok(self.session_problems_of(session_id).await.into_iter().nth(idx))
    }

    async fn find_session_problems(&self, session_id: i64) -> AppResult<Vec<SessionProblem>> {
        Ok(self.session_problems_of(session_id).await)
    }

    async fn update_session_problem(&self, session_problem: SessionProblem) -> AppResult<SessionProblem> {
        let mut state = self.state.write().await;
        let slot = state
            .session_problems
            .iter_mut()
            .find(|sp| sp.id == session_problem.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Session problem with id '{}' not found", session_problem.id))
            })?;
        *slot = session_problem.clone();
        Ok(session_problem)
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryStore {
    async fn session_problem_rows(&self, user_id: i64) -> AppResult<Vec<SessionProblemRow>> {
        let state = self.state.read().await;
        let mut sessions: Vec<&TestSession> = state.sessions.iter().filter(|s| s.user_id == user_id).collect();
        sessions.sort_by(|a, b| b.id.cmp(&a.id));

        let mut rows = Vec::new();
        for session in sessions {
            for sp in state.session_problems.iter().filter(|sp| sp.session_id == session.id) {
                if let Some(category_name) = state.category_name_of(sp.problem_id) {
                    rows.push(SessionProblemRow {
                        session_id: session.id,
                        start_time: session.start_time,
                        is_correct: sp.is_correct,
                        category_name,
                    });
                }
            }
        }
        Ok(rows)
    }

    async fn category_stats(&self, session_id: i64) -> AppResult<Vec<CategoryStats>> {
        let state = self.state.read().await;
        let named: Vec<(String, Option<bool>)> = state
            .session_problems
            .iter()
            .filter(|sp| sp.session_id == session_id)
            .filter_map(|sp| state.category_name_of(sp.problem_id).map(|name| (name, sp.is_correct)))
            .collect();

        Ok(tally_category_stats(
            named.iter().map(|(name, is_correct)| (name.as_str(), *is_correct)),
        ))
    }

    async fn weak_categories(&self, session_id: i64) -> AppResult<Vec<String>> {
        let stats = self.category_stats(session_id).await?;
        Ok(weak_categories(&stats))
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "mathquiz-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 1,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn app_state(store: Arc<InMemoryStore>) -> AppState {
    let repositories = Repositories {
        users: store.clone(),
        problems: store.clone(),
        sessions: store.clone(),
        statistics: store,
    };
    AppState::with_repositories(test_config(), repositories, None)
}
