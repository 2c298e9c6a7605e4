use std::collections::HashSet;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Choice, Problem},
};

/// Read-only access to the problem bank.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    /// Up to `per_category` distinct problems from each category, grouped
    /// in the order the category ids were given.
    async fn sample_problems(&self, category_ids: &[i64], per_category: usize) -> AppResult<Vec<Problem>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Problem>>;
    async fn find_choice_by_id(&self, choice_id: i64) -> AppResult<Option<Choice>>;
}

pub struct MongoProblemRepository {
    collection: Collection<Problem>,
}

impl MongoProblemRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("problems");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for problems collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let category_index = IndexModel::builder()
            .keys(doc! { "category_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_id".to_string())
                    .build(),
            )
            .build();

        let choice_index = IndexModel::builder()
            .keys(doc! { "choices.id": 1 })
            .options(
                IndexOptions::builder()
                    .name("choice_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(category_index).await?;
        self.collection.create_index(choice_index).await?;

        log::info!("Successfully created indexes for problems collection");
        Ok(())
    }
}

#[async_trait]
impl ProblemRepository for MongoProblemRepository {
    async fn sample_problems(&self, category_ids: &[i64], per_category: usize) -> AppResult<Vec<Problem>> {
        let mut problems = Vec::with_capacity(category_ids.len() * per_category);

        for &category_id in category_ids {
            let pipeline = vec![
                doc! { "$match": { "category_id": category_id } },
                doc! { "$sample": { "size": per_category as i64 } },
            ];

            let sampled: Vec<_> = self.collection.aggregate(pipeline).await?.try_collect().await?;

            // $sample may repeat a document when it falls back to a random cursor
            let mut seen = HashSet::new();
            for document in sampled {
                let problem: Problem = from_document(document)?;
                if seen.insert(problem.id) {
                    problems.push(problem);
                }
            }
        }

        Ok(problems)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Problem>> {
        let problem = self.collection.find_one(doc! { "id": id }).await?;
        Ok(problem)
    }

    async fn find_choice_by_id(&self, choice_id: i64) -> AppResult<Option<Choice>> {
        let problem = self
            .collection
            .find_one(doc! { "choices.id": choice_id })
            .await?;

        Ok(problem.and_then(|p| p.choices.into_iter().find(|c| c.id == choice_id)))
    }
}
