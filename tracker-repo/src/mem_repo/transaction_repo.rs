use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    CategorySpending, NewTransaction, PageOptions, Summary, Transaction, TransactionRepo,
    TransactionRepoError, TransactionType,
};
use crate::user_repo::UserId;
use anyhow::anyhow;
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    transactions: HashMap<i32, Transaction>,
    user_transactions: HashMap<UserId, HashSet<i32>>,
    next_id: i32,
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            user_transactions: HashMap::new(),
            next_id: 1,
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn user_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(&user_id) else {
            return Ok(Vec::new());
        };

        let transactions = transaction_ids
            .iter()
            .map(|id| {
                read_guard
                    .transactions
                    .get(id)
                    .expect("transactions should contain same ids as user_transactions")
            })
            .cloned()
            .collect();
        Ok(transactions)
    }
}

#[async_trait::async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        // The ownership check and the existence check are the same lookup, so
        // someone else's transaction id is reported as not found.
        let Some(transaction_ids) = read_guard.user_transactions.get(&user_id) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as user_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        user_id: UserId,
        page_options: PageOptions,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut transactions = self.user_transactions(user_id)?;
        transactions.sort_by(|a, b| b.cmp(a));

        let transactions = transactions
            .into_iter()
            .skip(page_options.offset as usize)
            .take(page_options.limit as usize)
            .collect();
        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        user_id: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let transaction = new_transaction.to_transaction(id);

        write_guard.transactions.insert(id, transaction.clone());
        write_guard
            .user_transactions
            .entry(user_id)
            .or_insert_with(HashSet::new)
            .insert(id);

        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get(&user_id) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let entry = write_guard.transactions.entry(transaction_id);
        if let Entry::Occupied(mut e) = entry {
            let transaction = updated_transaction.to_transaction(transaction_id);
            e.insert(transaction.clone());
            Ok(transaction)
        } else {
            Err(TransactionNotFound(transaction_id))
        }
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        transaction_id: i32,
    ) -> Result<(), TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get_mut(&user_id) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.remove(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        write_guard
            .transactions
            .remove(&transaction_id)
            .expect("ids in user_transactions should be present in transactions");
        Ok(())
    }

    async fn get_summary(&self, user_id: UserId) -> Result<Summary, TransactionRepoError> {
        let transactions = self.user_transactions(user_id)?;

        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        for t in transactions {
            match t.transaction_type {
                TransactionType::Income => total_income += t.amount,
                TransactionType::Expense => total_expenses += t.amount,
            }
        }

        Ok(Summary::new(total_income, total_expenses))
    }

    async fn get_monthly_spending(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategorySpending>, TransactionRepoError> {
        let (start, end) = crate::transaction_repo::month_window(year, month)?;

        let transactions = self.user_transactions(user_id)?;

        let mut spending: BTreeMap<String, Decimal> = BTreeMap::new();
        for t in transactions {
            if t.transaction_type != TransactionType::Expense {
                continue;
            }
            if t.date < start || t.date >= end {
                continue;
            }
            *spending.entry(t.category).or_insert(Decimal::ZERO) += t.amount;
        }

        let spending = spending
            .into_iter()
            .map(|(category, total_spent)| CategorySpending {
                category,
                total_spent,
            })
            .collect();
        Ok(spending)
    }
}
