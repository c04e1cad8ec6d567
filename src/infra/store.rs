use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use heed::{byteorder::BE, types::*, Database, Env, EnvOpenOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::error;

use crate::config::get_data_dir;
use crate::domain::account::{Account, AccountId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account {0} is already saved")]
    AlreadySaved(AccountId),
    #[error("account {0} is not saved")]
    NotFound(AccountId),
    #[error(transparent)]
    Db(#[from] heed::Error),
}

/// A user-saved account row, keyed by address. Snapshot fields are captured
/// at save time and never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAccount {
    pub address: AccountId,
    pub last_known_name: Option<String>,
    pub last_known_balance: Option<u64>,
}

impl SavedAccount {
    /// Address-only row, for saving before (or without) a successful fetch.
    pub fn bare(address: AccountId) -> Self {
        Self {
            address,
            last_known_name: None,
            last_known_balance: None,
        }
    }

    /// Row snapshotting a fetched account.
    pub fn snapshot(account: &Account) -> Self {
        Self {
            address: account.account,
            last_known_name: account.name.clone(),
            last_known_balance: Some(account.balance_nqt),
        }
    }
}

type SavedDb = Database<U64<BE>, SerdeRmp<SavedAccount>>;

type Watchers = Arc<Mutex<Vec<(AccountId, watch::Sender<Option<SavedAccount>>)>>>;

/// Wrapper around the LMDB database of saved accounts.
///
/// Writes go through [`Store::save_account`] and [`Store::delete_account`]
/// only, which lets the store republish the affected row to every live
/// observer after each commit.
#[derive(Clone)]
pub struct Store {
    env: Env,
    watchers: Watchers,
}

impl Store {
    pub fn new(network: &str) -> Result<Self, StoreError> {
        Self::with_path(get_data_dir().join(network).join("saved-accounts.mdb"))
    }

    pub fn with_path(path: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&path).map_err(heed::Error::Io)?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(10 * 1024 * 1024) // 10MB
                .max_dbs(4)
                .open(path)?
        };
        Ok(Self {
            env,
            watchers: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Save an account. Fails with [`StoreError::AlreadySaved`] when a row
    /// for the address exists; the prior row is left untouched.
    pub fn save_account(&self, account: &SavedAccount) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn()?;
        let db: SavedDb = self.env.create_database(&mut wtxn, Some("saved_accounts"))?;
        if db.get(&wtxn, &account.address.0)?.is_some() {
            return Err(StoreError::AlreadySaved(account.address));
        }
        db.put(&mut wtxn, &account.address.0, account)?;
        wtxn.commit()?;
        self.notify(account.address);
        Ok(())
    }

    /// Delete a saved account. Fails with [`StoreError::NotFound`] when no
    /// row for the address exists.
    pub fn delete_account(&self, address: AccountId) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn()?;
        let db: SavedDb = self.env.create_database(&mut wtxn, Some("saved_accounts"))?;
        if !db.delete(&mut wtxn, &address.0)? {
            return Err(StoreError::NotFound(address));
        }
        wtxn.commit()?;
        self.notify(address);
        Ok(())
    }

    /// Get a saved account by address.
    pub fn get_account(&self, address: AccountId) -> Result<Option<SavedAccount>, StoreError> {
        let rtxn = self.env.read_txn()?;
        let db: Option<SavedDb> = self.env.open_database(&rtxn, Some("saved_accounts"))?;
        match db {
            Some(db) => Ok(db.get(&rtxn, &address.0)?),
            None => Ok(None),
        }
    }

    /// List all saved accounts.
    pub fn list_accounts(&self) -> Result<Vec<SavedAccount>, StoreError> {
        let rtxn = self.env.read_txn()?;
        let db: Option<SavedDb> = self.env.open_database(&rtxn, Some("saved_accounts"))?;
        match db {
            Some(db) => {
                let mut accounts = Vec::new();
                for result in db.iter(&rtxn)? {
                    let (_, account) = result?;
                    accounts.push(account);
                }
                Ok(accounts)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Live view over one saved-account row.
    ///
    /// The receiver holds the current row immediately on subscription and is
    /// updated after every successful save or delete of that address.
    pub fn observe_account(
        &self,
        address: AccountId,
    ) -> Result<watch::Receiver<Option<SavedAccount>>, StoreError> {
        let current = self.get_account(address)?;
        let (tx, rx) = watch::channel(current);
        self.watchers
            .lock()
            .expect("watchers lock poisoned")
            .push((address, tx));
        Ok(rx)
    }

    /// Republish the row for `address` to its observers, dropping observers
    /// whose receivers are gone.
    fn notify(&self, address: AccountId) {
        let row = match self.get_account(address) {
            Ok(row) => row,
            Err(e) => {
                error!(%address, "failed to re-read saved account for observers: {e}");
                return;
            }
        };
        let mut watchers = self.watchers.lock().expect("watchers lock poisoned");
        watchers.retain(|(watched, tx)| *watched != address || tx.send(row.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::with_path(dir.path().join("saved-accounts.mdb")).unwrap();
        (dir, store)
    }

    #[test]
    fn save_then_get() {
        let (_dir, store) = test_store();
        let row = SavedAccount {
            address: AccountId(1),
            last_known_name: Some("alice".to_string()),
            last_known_balance: Some(500),
        };
        store.save_account(&row).unwrap();
        assert_eq!(store.get_account(AccountId(1)).unwrap(), Some(row));
        assert_eq!(store.get_account(AccountId(2)).unwrap(), None);
    }

    #[test]
    fn double_save_fails_and_keeps_the_prior_row() {
        let (_dir, store) = test_store();
        let first = SavedAccount {
            address: AccountId(1),
            last_known_name: Some("first".to_string()),
            last_known_balance: Some(1),
        };
        store.save_account(&first).unwrap();

        let second = SavedAccount {
            address: AccountId(1),
            last_known_name: Some("second".to_string()),
            last_known_balance: Some(2),
        };
        let err = store.save_account(&second).unwrap_err();
        assert!(matches!(err, StoreError::AlreadySaved(AccountId(1))));
        assert_eq!(store.get_account(AccountId(1)).unwrap(), Some(first));
    }

    #[test]
    fn delete_removes_the_row() {
        let (_dir, store) = test_store();
        store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
        store.delete_account(AccountId(1)).unwrap();
        assert_eq!(store.get_account(AccountId(1)).unwrap(), None);
    }

    #[test]
    fn delete_of_unsaved_address_fails_not_found() {
        let (_dir, store) = test_store();
        let err = store.delete_account(AccountId(42)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(AccountId(42))));
    }

    #[test]
    fn list_returns_all_rows() {
        let (_dir, store) = test_store();
        assert!(store.list_accounts().unwrap().is_empty());
        store.save_account(&SavedAccount::bare(AccountId(2))).unwrap();
        store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
        let listed = store.list_accounts().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|a| a.address == AccountId(1)));
        assert!(listed.iter().any(|a| a.address == AccountId(2)));
    }

    #[test]
    fn observation_emits_the_current_state_immediately() {
        let (_dir, store) = test_store();
        let rx = store.observe_account(AccountId(1)).unwrap();
        assert_eq!(*rx.borrow(), None);

        store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
        let rx_after = store.observe_account(AccountId(1)).unwrap();
        assert!(rx_after.borrow().is_some());
    }

    #[test]
    fn observation_tracks_saves_and_deletes() {
        let (_dir, store) = test_store();
        let mut rx = store.observe_account(AccountId(1)).unwrap();
        assert_eq!(*rx.borrow_and_update(), None);

        store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_some());

        // A save of a different address must not disturb this observer.
        store.save_account(&SavedAccount::bare(AccountId(2))).unwrap();
        assert!(!rx.has_changed().unwrap());

        store.delete_account(AccountId(1)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[test]
    fn dropped_observers_are_pruned_on_the_next_notify() {
        let (_dir, store) = test_store();
        let rx = store.observe_account(AccountId(1)).unwrap();
        drop(rx);
        store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
        assert!(store.watchers.lock().unwrap().is_empty());
    }

    #[test]
    fn rows_survive_reopening_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved-accounts.mdb");
        {
            let store = Store::with_path(path.clone()).unwrap();
            store.save_account(&SavedAccount::bare(AccountId(9))).unwrap();
        }
        let store = Store::with_path(path).unwrap();
        assert!(store.get_account(AccountId(9)).unwrap().is_some());
    }
}
