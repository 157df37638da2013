use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::user_repo::UserId;

#[derive(Debug)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

/// Every operation on an existing transaction takes the owner's id and must
/// match it together with the transaction id. A row owned by someone else is
/// reported as [TransactionRepoError::TransactionNotFound], same as a row
/// that does not exist.
#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_all_transactions(
        &self,
        user_id: UserId,
        page_options: PageOptions,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<(), TransactionRepoError>;

    async fn get_summary(&self, user_id: UserId) -> Result<Summary, TransactionRepoError>;

    async fn get_monthly_spending(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategorySpending>, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(anyhow::anyhow!("Unknown transaction type: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
    pub id: i32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Transaction {
    pub const fn new(
        id: i32,
        transaction_type: TransactionType,
        category: String,
        amount: Decimal,
        date: NaiveDate,
        description: Option<String>,
    ) -> Transaction {
        Transaction {
            id,
            transaction_type,
            category,
            amount,
            date,
            description,
        }
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date).then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl NewTransaction {
    pub const fn new(
        transaction_type: TransactionType,
        category: String,
        amount: Decimal,
        date: NaiveDate,
        description: Option<String>,
    ) -> NewTransaction {
        NewTransaction {
            transaction_type,
            category,
            amount,
            date,
            description,
        }
    }

    pub fn to_transaction(self, id: i32) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

impl Summary {
    pub fn new(total_income: Decimal, total_expenses: Decimal) -> Summary {
        Summary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct CategorySpending {
    pub category: String,
    pub total_spent: Decimal,
}

/// Half-open date range `[first of month, first of next month)` used by the
/// monthly spending queries.
pub(crate) fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), anyhow::Error> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("Invalid year/month: {}-{}", year, month))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| anyhow::anyhow!("Unable to compute month end"))?;
    Ok((start, end))
}
