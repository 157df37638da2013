use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    month_window, CategorySpending, NewTransaction, PageOptions, Summary, Transaction,
    TransactionRepo, TransactionRepoError, TransactionType,
};
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query, query_as, query_scalar, Pool, Postgres};
use std::str::FromStr;
use tracing::instrument;

pub struct SQLxTransactionRepo {
    pool: Pool<Postgres>,
}

impl SQLxTransactionRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxTransactionRepo {
        SQLxTransactionRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i32,
    #[sqlx(rename = "type")]
    transaction_type: String,
    category: String,
    amount: Decimal,
    date: NaiveDate,
    description: Option<String>,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&value.transaction_type)
            .with_context(|| format!("Invalid type stored for transaction {}", value.id))?;
        Ok(Transaction::new(
            value.id,
            transaction_type,
            value.category,
            value.amount,
            value.date,
            value.description,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct SummaryEntry {
    income: Option<Decimal>,
    expense: Option<Decimal>,
}

#[derive(sqlx::FromRow)]
struct CategorySpendingEntry {
    category: String,
    total_spent: Decimal,
}

#[async_trait]
impl TransactionRepo for SQLxTransactionRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        // Filtering on owner and id together keeps someone else's transaction
        // indistinguishable from a missing one.
        let entry: Option<TransactionEntry> = query_as(
            "SELECT id, type, category, amount, date, description FROM transactions WHERE id = $1 AND user_id = $2",
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        let entry = entry.ok_or(TransactionNotFound(transaction_id))?;
        Ok(entry.try_into()?)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user_id: UserId,
        page_options: PageOptions,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let entries: Vec<TransactionEntry> = query_as(
            "SELECT id, type, category, amount, date, description FROM transactions WHERE user_id = $1 ORDER BY date DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(page_options.offset)
        .bind(page_options.limit)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get transactions for user {}", user_id))?;

        let transactions = entries
            .into_iter()
            .map(|entry| entry.try_into())
            .collect::<Result<Vec<Transaction>, anyhow::Error>>()?;
        Ok(transactions)
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let id: i32 = query_scalar(
            "INSERT INTO transactions(user_id, type, category, amount, date, description) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(user_id)
        .bind(new_transaction.transaction_type.as_str())
        .bind(&new_transaction.category)
        .bind(new_transaction.amount)
        .bind(new_transaction.date)
        .bind(&new_transaction.description)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert transaction")?;

        Ok(new_transaction.to_transaction(id))
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let result = query(
            "UPDATE transactions SET type = $1, category = $2, amount = $3, date = $4, description = $5 WHERE id = $6 AND user_id = $7",
        )
        .bind(updated_transaction.transaction_type.as_str())
        .bind(&updated_transaction.category)
        .bind(updated_transaction.amount)
        .bind(updated_transaction.date)
        .bind(&updated_transaction.description)
        .bind(transaction_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;

        if result.rows_affected() == 0 {
            Err(TransactionNotFound(transaction_id))
        } else {
            Ok(updated_transaction.to_transaction(transaction_id))
        }
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<(), TransactionRepoError> {
        let result = query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(transaction_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;

        if result.rows_affected() == 0 {
            Err(TransactionNotFound(transaction_id))
        } else {
            Ok(())
        }
    }

    #[instrument(skip(self))]
    async fn get_summary(&self, user_id: UserId) -> Result<Summary, TransactionRepoError> {
        let entry: SummaryEntry = query_as(
            r#"
            SELECT SUM(amount) FILTER (WHERE type = 'income')  AS income,
                   SUM(amount) FILTER (WHERE type = 'expense') AS expense
            FROM transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Unable to get summary for user {}", user_id))?;

        Ok(Summary::new(
            entry.income.unwrap_or(Decimal::ZERO),
            entry.expense.unwrap_or(Decimal::ZERO),
        ))
    }

    #[instrument(skip(self))]
    async fn get_monthly_spending(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategorySpending>, TransactionRepoError> {
        let (start, end) = month_window(year, month)?;

        let entries: Vec<CategorySpendingEntry> = query_as(
            r#"
            SELECT category, SUM(amount) AS total_spent
            FROM transactions
            WHERE user_id = $1 AND type = 'expense' AND date >= $2 AND date < $3
            GROUP BY category
            ORDER BY category
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get monthly spending for user {}", user_id))?;

        let spending = entries
            .into_iter()
            .map(|entry| CategorySpending {
                category: entry.category,
                total_spent: entry.total_spent,
            })
            .collect();
        Ok(spending)
    }
}
