use crate::user_repo::{NewUser, User, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query_as, query_scalar, Pool, Postgres};
use tracing::instrument;

pub struct SQLxUserRepo {
    pool: Pool<Postgres>,
}

#[derive(sqlx::FromRow)]
struct UserEntry {
    id: i32,
    username: String,
    password_hash: String,
}

impl From<UserEntry> for User {
    fn from(value: UserEntry) -> Self {
        User {
            id: value.id,
            username: value.username,
            password_hash: value.password_hash,
        }
    }
}

impl SQLxUserRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxUserRepo {
        SQLxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepo for SQLxUserRepo {
    #[instrument(skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserRepoError> {
        let user: Option<UserEntry> = query_as(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", username))?;
        user.map(|u| u.into())
            .ok_or_else(|| UserRepoError::UserNotFound(username.to_owned()))
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let id: Option<i32> = query_scalar(
            "INSERT INTO users(username, password_hash) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", new_user.username))?;
        match id {
            Some(id) => Ok(User {
                id,
                username: new_user.username,
                password_hash: new_user.password_hash,
            }),
            None => Err(UserRepoError::UserAlreadyExists(new_user.username)),
        }
    }
}
