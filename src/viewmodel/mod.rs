pub mod account_details;
pub mod block_details;

/// Per-screen fetch state.
///
/// `Failed` is a distinct terminal value so the UI can render an error state
/// instead of spinning on `Loading` forever.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Loaded(T),
    Failed,
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
