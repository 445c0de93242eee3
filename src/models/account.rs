use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::InsightError;

/// Named partition for grouping entries and trades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingAccount {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountInput {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// In-memory owner of every user's accounts.
///
/// Invariant: each user with at least one account has exactly one account
/// flagged default. All mutations go through `&mut self`, so the
/// clear-then-set sequence in `set_default` is never observed half done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountBook {
    accounts: Vec<TradingAccount>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from stored rows, repairing users with zero or several defaults
    pub fn from_accounts(accounts: Vec<TradingAccount>) -> Self {
        let mut book = Self { accounts };

        let mut users: Vec<String> = book.accounts.iter().map(|a| a.user_id.clone()).collect();
        users.sort();
        users.dedup();

        for user_id in users {
            let defaults = book
                .accounts
                .iter()
                .filter(|a| a.user_id == user_id && a.is_default)
                .count();
            if defaults != 1 {
                log::warn!(
                    "User {} has {} default accounts, promoting the oldest",
                    user_id,
                    defaults
                );
                book.promote_oldest(&user_id);
            }
        }

        book
    }

    pub fn accounts(&self) -> &[TradingAccount] {
        &self.accounts
    }

    pub fn accounts_for(&self, user_id: &str) -> Vec<&TradingAccount> {
        self.accounts.iter().filter(|a| a.user_id == user_id).collect()
    }

    pub fn default_account(&self, user_id: &str) -> Option<&TradingAccount> {
        self.accounts
            .iter()
            .find(|a| a.user_id == user_id && a.is_default)
    }

    /// Create an account; a user's first account becomes the default
    pub fn create_account(&mut self, input: CreateAccountInput) -> TradingAccount {
        let is_first = self.accounts.iter().all(|a| a.user_id != input.user_id);

        let account = TradingAccount {
            id: format!("ACCOUNT-{}", uuid::Uuid::new_v4()),
            user_id: input.user_id,
            name: input.name,
            description: input.description,
            is_default: is_first,
            created_at: Utc::now(),
        };

        self.accounts.push(account.clone());
        account
    }

    /// Make `account_id` the user's only default account
    pub fn set_default(&mut self, user_id: &str, account_id: &str) -> Result<(), InsightError> {
        let exists = self
            .accounts
            .iter()
            .any(|a| a.user_id == user_id && a.id == account_id);
        if !exists {
            return Err(InsightError::AccountNotFound(account_id.to_string()));
        }

        for account in self.accounts.iter_mut().filter(|a| a.user_id == user_id) {
            account.is_default = account.id == account_id;
        }

        Ok(())
    }

    pub fn remove_account(
        &mut self,
        user_id: &str,
        account_id: &str,
    ) -> Result<TradingAccount, InsightError> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.user_id == user_id && a.id == account_id)
            .ok_or_else(|| InsightError::AccountNotFound(account_id.to_string()))?;

        let removed = self.accounts.remove(index);
        if removed.is_default {
            self.promote_oldest(user_id);
        }

        Ok(removed)
    }

    fn promote_oldest(&mut self, user_id: &str) {
        let oldest = self
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .min_by_key(|a| a.created_at)
            .map(|a| a.id.clone());

        if let Some(oldest_id) = oldest {
            for account in self.accounts.iter_mut().filter(|a| a.user_id == user_id) {
                account.is_default = account.id == oldest_id;
            }
        }
    }
}
