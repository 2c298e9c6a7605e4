use mongodb::{
    bson::doc,
    options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Monotonic id sequence backing the numeric ids of every collection.
#[derive(Debug, Deserialize, Serialize)]
struct Counter {
    #[serde(rename = "_id")]
    name: String,
    seq: i64,
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Reserves `count` consecutive ids from the named sequence and returns
    /// the first one. Ids handed out by one call are contiguous and strictly
    /// greater than any id handed out before.
    pub async fn reserve_ids(&self, sequence: &str, count: i64) -> AppResult<i64> {
        if count < 1 {
            return Err(AppError::InternalError(format!(
                "cannot reserve {} ids from sequence '{}'",
                count, sequence
            )));
        }

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .get_collection::<Counter>("counters")
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": count } })
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::PersistenceError(format!("sequence '{}' did not return a value", sequence))
            })?;

        Ok(counter.seq - count + 1)
    }

    pub async fn next_id(&self, sequence: &str) -> AppResult<i64> {
        self.reserve_ids(sequence, 1).await
    }
}
