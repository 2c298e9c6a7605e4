use async_trait::async_trait;
use mongodb::{bson::doc, error::ErrorKind, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::User,
};

const USERS_SEQUENCE: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and returns it with its assigned id.
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn find_by_login_id(&self, login_id: &str) -> AppResult<Option<User>>;
}

pub struct MongoUserRepository {
    db: Database,
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            collection: db.get_collection("users"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for users collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let login_id_index = IndexModel::builder()
            .keys(doc! { "login_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("login_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(login_id_index).await?;

        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(mongodb::error::WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        _ => false,
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        user.id = self.db.next_id(USERS_SEQUENCE).await?;

        // The unique index on login_id settles races between two registrations
        if let Err(err) = self.collection.insert_one(&user).await {
            if is_duplicate_key(&err) {
                return Err(AppError::AlreadyExists(format!(
                    "User with login id '{}' already exists",
                    user.login_id
                )));
            }
            return Err(err.into());
        }

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_login_id(&self, login_id: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "login_id": login_id })
            .await?;
        Ok(user)
    }
}
