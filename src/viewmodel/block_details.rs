use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::block::{BlockQuery, BlockWithGenerator};
use crate::infra::node::{fetch_block_with_generator, ExplorerApi};

use super::FetchState;

/// View-model for the block details screen.
///
/// Key validation happens before construction: a screen is only opened for a
/// [`BlockQuery`], and `BlockQuery::from_params` refuses to produce one when
/// neither a height nor an id was supplied.
pub struct BlockDetailsViewModel {
    query: BlockQuery,
    block_rx: watch::Receiver<FetchState<BlockWithGenerator>>,
    fetch_task: JoinHandle<()>,
}

impl BlockDetailsViewModel {
    pub fn new<A: ExplorerApi>(api: A, query: BlockQuery) -> Self {
        let (tx, block_rx) = watch::channel(FetchState::Loading);
        let fetch_task = tokio::spawn(async move {
            let state = match fetch_block_with_generator(&api, query).await {
                Ok(block) => FetchState::Loaded(block),
                Err(e) => {
                    warn!(%query, "block fetch failed: {e}");
                    FetchState::Failed
                }
            };
            let _ = tx.send(state);
        });

        Self {
            query,
            block_rx,
            fetch_task,
        }
    }

    pub fn query(&self) -> BlockQuery {
        self.query
    }

    pub fn block(&self) -> FetchState<BlockWithGenerator> {
        self.block_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<BlockWithGenerator>> {
        self.block_rx.clone()
    }
}

impl Drop for BlockDetailsViewModel {
    fn drop(&mut self) {
        self.fetch_task.abort();
    }
}
