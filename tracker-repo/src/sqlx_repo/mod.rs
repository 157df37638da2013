mod transaction_repo;
mod user_repo;

use crate::sqlx_repo::transaction_repo::SQLxTransactionRepo;
use crate::sqlx_repo::user_repo::SQLxUserRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

pub async fn create_repos(
    database_url: String,
    max_pool_size: u32,
) -> Result<(Arc<dyn TransactionRepo>, Arc<dyn UserRepo>), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(&database_url)
        .await
        .context("Unable to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    let transaction_repo = SQLxTransactionRepo::new(pool.clone());
    let user_repo = SQLxUserRepo::new(pool);
    Ok((Arc::new(transaction_repo), Arc::new(user_repo)))
}
