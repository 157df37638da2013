use async_trait::async_trait;
use thiserror::Error;

pub type UserId = i32;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserRepoError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError>;
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
