pub mod statistics_service;
pub mod test_session_service;
pub mod user_service;
