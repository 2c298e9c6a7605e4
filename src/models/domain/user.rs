use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::dto::request::RegisterRequest;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,              // Assigned by the repository on create
    pub login_id: String,     // Unique, chosen at registration
    pub user_name: String,    // Display name
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(login_id: &str, user_name: &str, password: &str) -> Self {
        User {
            id: 0,
            login_id: login_id.to_string(),
            user_name: user_name.to_string(),
            password_hash: hash_password(login_id, password),
            created_at: Some(Utc::now()),
        }
    }

    pub fn from_request(request: &RegisterRequest) -> Self {
        User::new(&request.login_id, &request.user_name, &request.password1)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(&self.login_id, password)
    }
}

/// Login id is mixed in so equal passwords never share a hash.
pub fn hash_password(login_id: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(login_id.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
