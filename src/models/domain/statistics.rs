use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Categories whose correct ratio is strictly below this are weak.
pub const WEAK_RATIO_THRESHOLD: f64 = 0.5;
pub const WEAK_CATEGORY_LIMIT: usize = 2;

/// One session problem joined with its session and category.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SessionProblemRow {
    pub session_id: i64,
    pub start_time: DateTime<Utc>,
    pub is_correct: Option<bool>, // None while unanswered
    pub category_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    #[serde(rename = "categoryName")]
    pub name: String,
    #[serde(rename = "total")]
    pub total_count: usize,
    pub correct_count: usize,
}

impl CategoryStats {
    pub fn correct_ratio(&self) -> Option<f64> {
        if self.total_count == 0 {
            return None;
        }
        Some(self.correct_count as f64 / self.total_count as f64)
    }
}

/// Tallies outcomes per category name, in order of first appearance.
pub fn tally_category_stats<'a, I>(outcomes: I) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = (&'a str, Option<bool>)>,
{
    let mut tally: IndexMap<&str, (usize, usize)> = IndexMap::new();
    for (name, is_correct) in outcomes {
        let entry = tally.entry(name).or_insert((0, 0));
        entry.0 += 1;
        if is_correct == Some(true) {
            entry.1 += 1;
        }
    }

    tally
        .into_iter()
        .map(|(name, (total_count, correct_count))| CategoryStats {
            name: name.to_string(),
            total_count,
            correct_count,
        })
        .collect()
}

/// Names of the weakest categories, weakest first, at most
/// `WEAK_CATEGORY_LIMIT`. Equal ratios keep their input order.
pub fn weak_categories(stats: &[CategoryStats]) -> Vec<String> {
    let mut weak: Vec<(f64, &str)> = stats
        .iter()
        .filter_map(|s| s.correct_ratio().map(|ratio| (ratio, s.name.as_str())))
        .filter(|(ratio, _)| *ratio < WEAK_RATIO_THRESHOLD)
        .collect();

    weak.sort_by(|a, b| a.0.total_cmp(&b.0));

    weak.into_iter()
        .take(WEAK_CATEGORY_LIMIT)
        .map(|(_, name)| name.to_string())
        .collect()
}
