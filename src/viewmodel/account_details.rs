use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::account::{AccountId, AccountWithRewardRecipient};
use crate::infra::node::{fetch_account_with_reward_recipient, ExplorerApi};
use crate::infra::store::{SavedAccount, Store, StoreError};

use super::FetchState;

/// View-model for the account details screen.
///
/// The fetch-and-enrich operation is issued exactly once at construction on
/// a spawned task and published into a watch slot. Independently, the
/// saved-account store is observed for the same address; a failed
/// subscription hides the save affordance instead of failing the screen.
/// Dropping the view-model aborts the fetch, so nothing is published after
/// the screen is gone.
pub struct AccountDetailsViewModel {
    address: AccountId,
    store: Store,
    account_rx: watch::Receiver<FetchState<AccountWithRewardRecipient>>,
    saved_rx: Option<watch::Receiver<Option<SavedAccount>>>,
    fetch_task: JoinHandle<()>,
}

impl AccountDetailsViewModel {
    pub fn new<A: ExplorerApi>(api: A, store: Store, address: AccountId) -> Self {
        let (tx, account_rx) = watch::channel(FetchState::Loading);
        let fetch_task = tokio::spawn(async move {
            let state = match fetch_account_with_reward_recipient(&api, address).await {
                Ok(account) => FetchState::Loaded(account),
                Err(e) => {
                    warn!(%address, "account fetch failed: {e}");
                    FetchState::Failed
                }
            };
            let _ = tx.send(state);
        });

        let saved_rx = match store.observe_account(address) {
            Ok(rx) => Some(rx),
            Err(e) => {
                warn!(%address, "saved-account subscription failed: {e}");
                None
            }
        };

        Self {
            address,
            store,
            account_rx,
            saved_rx,
            fetch_task,
        }
    }

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn account(&self) -> FetchState<AccountWithRewardRecipient> {
        self.account_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<AccountWithRewardRecipient>> {
        self.account_rx.clone()
    }

    /// Saved state of this screen's address. `None` means the store
    /// subscription failed and the save affordance is hidden.
    pub fn is_saved(&self) -> Option<bool> {
        self.saved_rx.as_ref().map(|rx| rx.borrow().is_some())
    }

    /// Persist a snapshot of the loaded account, or a bare address-only row
    /// when no entity has loaded. The caller splits the outcome into
    /// user-surfaced (`AlreadySaved`) versus logged-and-swallowed.
    pub fn save(&self) -> Result<(), StoreError> {
        let row = match &*self.account_rx.borrow() {
            FetchState::Loaded(loaded) => SavedAccount::snapshot(&loaded.account),
            _ => SavedAccount::bare(self.address),
        };
        self.store.save_account(&row)
    }

    /// Remove the row for this screen's address.
    pub fn unsave(&self) -> Result<(), StoreError> {
        self.store.delete_account(self.address)
    }
}

impl Drop for AccountDetailsViewModel {
    fn drop(&mut self) {
        self.fetch_task.abort();
    }
}
