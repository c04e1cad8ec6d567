//! End-to-end detail screen flow tests.
//!
//! Drives the account and block view-models over a stubbed node API and a
//! temporary saved-account store:
//! 1. Fetch-and-enrich publishes Loaded/Failed terminal states
//! 2. Save/unsave round-trips through the live saved-state subscription
//! 3. Teardown aborts the outstanding fetch

use std::collections::HashMap;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::watch;

use burst_explorer::domain::account::{Account, AccountId};
use burst_explorer::domain::block::{Block, BlockId, BlockQuery};
use burst_explorer::infra::node::{ExplorerApi, NodeError};
use burst_explorer::infra::store::{Store, StoreError};
use burst_explorer::viewmodel::account_details::AccountDetailsViewModel;
use burst_explorer::viewmodel::block_details::BlockDetailsViewModel;
use burst_explorer::viewmodel::FetchState;

#[derive(Clone, Default)]
struct StubApi {
    accounts: Arc<HashMap<u64, Account>>,
    blocks: Arc<HashMap<u64, Block>>,
}

impl StubApi {
    fn new(accounts: Vec<Account>, blocks: Vec<Block>) -> Self {
        Self {
            accounts: Arc::new(accounts.into_iter().map(|a| (a.account.0, a)).collect()),
            blocks: Arc::new(blocks.into_iter().map(|b| (b.block_id.0, b)).collect()),
        }
    }
}

impl ExplorerApi for StubApi {
    async fn get_account(&self, account: AccountId) -> Result<Account, NodeError> {
        self.accounts
            .get(&account.0)
            .cloned()
            .ok_or(NodeError::Api {
                code: 5,
                description: "Unknown account".to_string(),
            })
    }

    async fn get_block(&self, query: BlockQuery) -> Result<Block, NodeError> {
        let block = match query {
            BlockQuery::Height(height) => {
                self.blocks.values().find(|b| b.height == height).cloned()
            }
            BlockQuery::Id(id) => self.blocks.get(&id.0).cloned(),
        };
        block.ok_or(NodeError::Api {
            code: 5,
            description: "Unknown block".to_string(),
        })
    }
}

/// Node API that never answers, for teardown tests.
#[derive(Clone)]
struct HangingApi;

impl ExplorerApi for HangingApi {
    async fn get_account(&self, _account: AccountId) -> Result<Account, NodeError> {
        std::future::pending().await
    }

    async fn get_block(&self, _query: BlockQuery) -> Result<Block, NodeError> {
        std::future::pending().await
    }
}

fn account(id: u64, name: &str, balance_nqt: u64, reward_recipient: Option<u64>) -> Account {
    Account {
        account: AccountId(id),
        account_rs: format!("BURST-TEST-{id}"),
        public_key: Some("aa".to_string()),
        name: Some(name.to_string()),
        description: None,
        balance_nqt,
        forged_balance_nqt: 0,
        reward_recipient: reward_recipient.map(AccountId),
    }
}

fn block(id: u64, height: u64, generator: u64) -> Block {
    Block {
        block_id: BlockId(id),
        height,
        timestamp: 113_415_445,
        number_of_transactions: 21,
        total_amount_nqt: 376_367_700_000_000,
        total_fee_nqt: 2_100_000_000,
        payload_length: 4432,
        generator: AccountId(generator),
    }
}

fn test_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::with_path(dir.path().join("saved-accounts.mdb")).unwrap();
    (dir, store)
}

/// Wait for the fetch slot to leave `Loading`.
async fn settle<T: Clone>(rx: &mut watch::Receiver<FetchState<T>>) -> FetchState<T> {
    loop {
        let state = rx.borrow_and_update().clone();
        if !state.is_loading() {
            return state;
        }
        rx.changed()
            .await
            .expect("fetch slot dropped while still loading");
    }
}

#[tokio::test]
async fn account_screen_loads_the_requested_account() {
    let api = StubApi::new(
        vec![
            account(1, "alice", 1_470_000_000, Some(2)),
            account(2, "pool", 0, None),
        ],
        vec![],
    );
    let (_dir, store) = test_store();

    let vm = AccountDetailsViewModel::new(api, store, AccountId(1));
    let mut rx = vm.subscribe();

    let FetchState::Loaded(loaded) = settle(&mut rx).await else {
        panic!("expected the account to load");
    };
    assert_eq!(loaded.account.account, AccountId(1));
    assert_eq!(
        loaded.reward_recipient.as_ref().map(|r| r.account),
        Some(AccountId(2))
    );
    assert_eq!(loaded.recipient_name(), Some("pool"));
}

#[tokio::test]
async fn fetch_failure_publishes_a_terminal_failed_state() {
    let (_dir, store) = test_store();
    let vm = AccountDetailsViewModel::new(StubApi::default(), store, AccountId(9));
    let mut rx = vm.subscribe();
    assert_eq!(settle(&mut rx).await, FetchState::Failed);
}

#[tokio::test]
async fn save_and_unsave_round_trip_through_the_live_subscription() {
    let api = StubApi::new(vec![account(1, "alice", 777, None)], vec![]);
    let (_dir, store) = test_store();

    let vm = AccountDetailsViewModel::new(api, store.clone(), AccountId(1));
    let mut rx = vm.subscribe();
    settle(&mut rx).await;

    assert_eq!(vm.is_saved(), Some(false));

    vm.save().unwrap();
    assert_eq!(vm.is_saved(), Some(true));

    // The saved row snapshots the loaded entity.
    let row = store.get_account(AccountId(1)).unwrap().unwrap();
    assert_eq!(row.last_known_name.as_deref(), Some("alice"));
    assert_eq!(row.last_known_balance, Some(777));

    // A second save is the distinguished "already saved" outcome and leaves
    // the prior row unchanged.
    let err = vm.save().unwrap_err();
    assert!(matches!(err, StoreError::AlreadySaved(AccountId(1))));
    assert_eq!(store.get_account(AccountId(1)).unwrap(), Some(row));

    vm.unsave().unwrap();
    assert_eq!(vm.is_saved(), Some(false));
    assert_eq!(store.get_account(AccountId(1)).unwrap(), None);

    let err = vm.unsave().unwrap_err();
    assert!(matches!(err, StoreError::NotFound(AccountId(1))));
}

#[tokio::test]
async fn save_before_load_persists_a_bare_address_row() {
    let (_dir, store) = test_store();
    // The fetch fails, so there is no entity to snapshot.
    let vm = AccountDetailsViewModel::new(StubApi::default(), store.clone(), AccountId(5));
    let mut rx = vm.subscribe();
    assert_eq!(settle(&mut rx).await, FetchState::Failed);

    vm.save().unwrap();
    let row = store.get_account(AccountId(5)).unwrap().unwrap();
    assert_eq!(row.address, AccountId(5));
    assert_eq!(row.last_known_name, None);
    assert_eq!(row.last_known_balance, None);
}

#[tokio::test]
async fn block_screen_loads_with_its_generator() {
    let api = StubApi::new(
        vec![account(7, "forger", 0, Some(7))],
        vec![block(50, 471807, 7)],
    );

    let vm = BlockDetailsViewModel::new(api.clone(), BlockQuery::Height(471807));
    let mut rx = vm.subscribe();
    let FetchState::Loaded(loaded) = settle(&mut rx).await else {
        panic!("expected the block to load");
    };
    assert_eq!(loaded.block.block_id, BlockId(50));
    assert_eq!(loaded.generator.account.account, AccountId(7));
    assert!(loaded.generator.recipient_is_self());

    let vm = BlockDetailsViewModel::new(api, BlockQuery::Id(BlockId(50)));
    let mut rx = vm.subscribe();
    let FetchState::Loaded(by_id) = settle(&mut rx).await else {
        panic!("expected the block to load");
    };
    assert_eq!(by_id.block, loaded.block);
}

#[tokio::test]
async fn unknown_block_fails_the_screen() {
    let vm = BlockDetailsViewModel::new(StubApi::default(), BlockQuery::Height(1));
    let mut rx = vm.subscribe();
    assert_eq!(settle(&mut rx).await, FetchState::Failed);
}

#[test]
fn a_block_screen_needs_a_key_before_any_fetch() {
    // No view-model (and therefore no fetch) can exist without a key.
    assert_eq!(BlockQuery::from_params(None, None), None);
}

#[tokio::test]
async fn dropping_the_view_model_aborts_the_fetch() {
    let (_dir, store) = test_store();
    let vm = AccountDetailsViewModel::new(HangingApi, store, AccountId(1));
    let mut rx = vm.subscribe();

    drop(vm);

    // The aborted task drops the slot without ever publishing a value.
    rx.changed().await.unwrap_err();
    assert!(rx.borrow().is_loading());
}
