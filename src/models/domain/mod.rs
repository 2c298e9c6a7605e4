pub mod problem;
pub mod statistics;
pub mod test_session;
pub mod user;

pub use problem::{Category, Choice, Problem};
pub use statistics::{CategoryStats, SessionProblemRow};
pub use test_session::{SessionProblem, TestSession};
pub use user::User;
