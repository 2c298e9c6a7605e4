use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::request::{LoginRequest, RegisterRequest},
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        if request.password1 != request.password2 {
            return Err(AppError::ValidationError("Passwords do not match".to_string()));
        }

        if self
            .repository
            .find_by_login_id(&request.login_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Login id '{}' is already taken",
                request.login_id
            )));
        }

        let user = self.repository.create(User::from_request(&request)).await?;
        log::info!("Registered user {} ({})", user.id, user.login_id);
        Ok(user)
    }

    /// Unknown login ids and wrong passwords fail the same way.
    pub async fn authenticate(&self, request: LoginRequest) -> AppResult<User> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("invalid credentials".to_string());

        let user = self
            .repository
            .find_by_login_id(&request.login_id)
            .await?
            .ok_or_else(invalid)?;

        if !user.verify_password(&request.password) {
            log::warn!("Failed login for {}", request.login_id);
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;

    fn register_request(password2: &str) -> RegisterRequest {
        RegisterRequest {
            user_name: "Taro".to_string(),
            login_id: "taro001".to_string(),
            password1: "secret1".to_string(),
            password2: password2.to_string(),
        }
    }

    fn stored_user() -> User {
        let mut user = User::new("taro001", "Taro", "secret1");
        user.id = 3;
        user
    }

    #[tokio::test]
    async fn test_register_creates_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id()
            .withf(|login_id| login_id == "taro001")
            .returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|mut user| {
            user.id = 1;
            Ok(user)
        });

        let user = UserService::new(Arc::new(repo))
            .register(register_request("secret1"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.user_name, "Taro");
        assert!(user.verify_password("secret1"));
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let result = UserService::new(Arc::new(repo))
            .register(register_request("secret2"))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_login_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id().never();

        let mut request = register_request("secret1");
        request.login_id = "ab".to_string();

        let result = UserService::new(Arc::new(repo)).register(request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_login_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id()
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_create().never();

        let result = UserService::new(Arc::new(repo))
            .register(register_request("secret1"))
            .await;
        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id()
            .returning(|_| Ok(Some(stored_user())));

        let user = UserService::new(Arc::new(repo))
            .authenticate(LoginRequest {
                login_id: "taro001".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.id, 3);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id()
            .returning(|_| Ok(Some(stored_user())));

        let result = UserService::new(Arc::new(repo))
            .authenticate(LoginRequest {
                login_id: "taro001".to_string(),
                password: "wrong12".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_login_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login_id().returning(|_| Ok(None));

        let result = UserService::new(Arc::new(repo))
            .authenticate(LoginRequest {
                login_id: "nobody1".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = UserService::new(Arc::new(repo)).get_user(9).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
