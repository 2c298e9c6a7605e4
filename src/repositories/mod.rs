pub mod problem_repository;
pub mod statistics_repository;
pub mod test_session_repository;
pub mod user_repository;

pub use problem_repository::{MongoProblemRepository, ProblemRepository};
pub use statistics_repository::{MongoStatisticsRepository, StatisticsRepository};
pub use test_session_repository::{MongoTestSessionRepository, TestSessionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
