use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{SessionProblemRow, User},
        dto::response::{SessionSummaryDto, UserStatisticsDto},
    },
    repositories::StatisticsRepository,
};

const JST_OFFSET_SECONDS: i32 = 9 * 3600;
const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a session start time in Japan Standard Time.
pub fn format_start_time(start_time: &DateTime<Utc>) -> AppResult<String> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECONDS)
        .ok_or_else(|| AppError::InternalError("invalid JST offset".to_string()))?;
    Ok(start_time.with_timezone(&jst).format(START_TIME_FORMAT).to_string())
}

struct SessionTally {
    start_time: DateTime<Utc>,
    total: usize,
    correct_count: usize,
}

pub struct StatisticsService {
    repository: Arc<dyn StatisticsRepository>,
}

impl StatisticsService {
    pub fn new(repository: Arc<dyn StatisticsRepository>) -> Self {
        Self { repository }
    }

    /// Builds the per-session history for `user`, in the order the
    /// repository returns the sessions.
    pub async fn build_user_statistics(&self, user: &User) -> AppResult<UserStatisticsDto> {
        let rows = self
            .repository
            .session_problem_rows(user.id)
            .await
            .map_err(|e| e.context(format!("get session rows for user {}", user.id)))?;

        let mut test_sess_dtos = Vec::new();
        for (session_id, tally) in group_by_session(&rows) {
            let category_dtos = self
                .repository
                .category_stats(session_id)
                .await
                .map_err(|e| e.context(format!("get category stats for session {}", session_id)))?;

            let weak_categories = self
                .repository
                .weak_categories(session_id)
                .await
                .map_err(|e| e.context(format!("get weak categories for session {}", session_id)))?;

            test_sess_dtos.push(SessionSummaryDto {
                session_id,
                start_time: format_start_time(&tally.start_time)?,
                total: tally.total,
                correct_count: tally.correct_count,
                category_dtos,
                weak_categories,
            });
        }

        log::debug!(
            "Built statistics for user {} covering {} sessions",
            user.id,
            test_sess_dtos.len()
        );

        Ok(UserStatisticsDto {
            user_name: user.user_name.clone(),
            test_sess_dtos,
        })
    }
}

fn group_by_session(rows: &[SessionProblemRow]) -> IndexMap<i64, SessionTally> {
    let mut sessions: IndexMap<i64, SessionTally> = IndexMap::new();
    for row in rows {
        let tally = sessions.entry(row.session_id).or_insert_with(|| SessionTally {
            start_time: row.start_time,
            total: 0,
            correct_count: 0,
        });
        tally.total += 1;
        if row.is_correct == Some(true) {
            tally.correct_count += 1;
        }
    }
    sessions
}
