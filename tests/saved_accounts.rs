//! Saved-account store behavior across the clones the app hands out.
//!
//! The app keeps one store and clones it into every account screen, so
//! writes through any clone must reach observers registered through any
//! other clone.

use burst_explorer::domain::account::AccountId;
use burst_explorer::infra::store::{SavedAccount, Store, StoreError};

fn test_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::with_path(dir.path().join("saved-accounts.mdb")).unwrap();
    (dir, store)
}

#[test]
fn clones_share_rows_and_observers() {
    let (_dir, store) = test_store();
    let screen_store = store.clone();

    let mut rx = screen_store.observe_account(AccountId(1)).unwrap();
    assert_eq!(*rx.borrow_and_update(), None);

    // A save through the app's handle reaches the screen's observer.
    store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_some());

    // And a delete through the screen's handle is visible to the app.
    screen_store.delete_account(AccountId(1)).unwrap();
    assert_eq!(store.get_account(AccountId(1)).unwrap(), None);
}

#[test]
fn save_errors_do_not_disturb_observers() {
    let (_dir, store) = test_store();
    store.save_account(&SavedAccount::bare(AccountId(1))).unwrap();

    let mut rx = store.observe_account(AccountId(1)).unwrap();
    rx.borrow_and_update();

    let err = store.save_account(&SavedAccount::bare(AccountId(1))).unwrap_err();
    assert!(matches!(err, StoreError::AlreadySaved(AccountId(1))));
    assert!(!rx.has_changed().unwrap());

    let err = store.delete_account(AccountId(2)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(AccountId(2))));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn per_address_observers_are_independent() {
    let (_dir, store) = test_store();
    let mut one = store.observe_account(AccountId(1)).unwrap();
    let mut two = store.observe_account(AccountId(2)).unwrap();
    one.borrow_and_update();
    two.borrow_and_update();

    store.save_account(&SavedAccount::bare(AccountId(2))).unwrap();
    assert!(!one.has_changed().unwrap());
    assert!(two.has_changed().unwrap());
}
