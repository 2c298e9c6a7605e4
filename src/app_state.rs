use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoProblemRepository, MongoStatisticsRepository, MongoTestSessionRepository,
        MongoUserRepository, ProblemRepository, StatisticsRepository, TestSessionRepository,
        UserRepository,
    },
    services::{
        statistics_service::StatisticsService, test_session_service::TestSessionService,
        user_service::UserService,
    },
};

/// Repository handles the services are built from.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub sessions: Arc<dyn TestSessionRepository>,
    pub statistics: Arc<dyn StatisticsRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub test_session_service: Arc<TestSessionService>,
    pub statistics_service: Arc<StatisticsService>,
    pub jwt_service: JwtService,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let problem_repository = Arc::new(MongoProblemRepository::new(&db));
        problem_repository.ensure_indexes().await?;

        let session_repository = Arc::new(MongoTestSessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let repositories = Repositories {
            users: user_repository,
            problems: problem_repository,
            sessions: session_repository,
            statistics: Arc::new(MongoStatisticsRepository::new(&db)),
        };

        Ok(Self::with_repositories(config, repositories, Some(db)))
    }

    pub fn with_repositories(config: Config, repositories: Repositories, db: Option<Database>) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Self {
            user_service: Arc::new(UserService::new(repositories.users)),
            test_session_service: Arc::new(TestSessionService::new(
                repositories.sessions,
                repositories.problems,
            )),
            statistics_service: Arc::new(StatisticsService::new(repositories.statistics)),
            jwt_service,
            db,
            config: Arc::new(config),
        }
    }
}
