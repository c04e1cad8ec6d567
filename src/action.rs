use serde::{Deserialize, Serialize};
use strum::Display;

use crate::domain::account::AccountId;
use crate::domain::block::BlockQuery;

/// Actions that can be triggered by user input or internal events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    Error(String),

    // Tab switching
    TabSearch,
    TabAccount,
    TabBlock,
    TabSaved,

    // Navigation into detail screens
    ViewAccount(AccountId),
    ViewBlock(BlockQuery),

    // Saved-account actions
    ToggleSaveAccount,
    DeleteSavedAccount(AccountId),
}
