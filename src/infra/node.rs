use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::account::{Account, AccountId, AccountWithRewardRecipient};
use crate::domain::block::{Block, BlockQuery, BlockWithGenerator};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("node returned error {code}: {description}")]
    Api { code: u64, description: String },
    #[error("unexpected node response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only operations against the remote node. Seam for tests; the real
/// implementation is [`NodeClient`].
pub trait ExplorerApi: Clone + Send + Sync + 'static {
    fn get_account(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<Account, NodeError>> + Send;

    fn get_block(&self, query: BlockQuery)
    -> impl Future<Output = Result<Block, NodeError>> + Send;
}

/// Burst node JSON API client.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl NodeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.network.node_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn node_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one API request. The node reports failures in-band as an
    /// `errorCode`/`errorDescription` envelope with HTTP 200.
    async fn request<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<T, NodeError> {
        let url = format!("{}/burst", self.base_url);
        let value: Value = self.http.get(&url).query(params).send().await?.json().await?;
        if let Some(code) = value.get("errorCode").and_then(Value::as_u64) {
            let description = value
                .get("errorDescription")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(NodeError::Api { code, description });
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl ExplorerApi for NodeClient {
    async fn get_account(&self, account: AccountId) -> Result<Account, NodeError> {
        debug!(%account, "fetching account");
        self.request(&[
            ("requestType", "getAccount".to_string()),
            ("account", account.to_string()),
        ])
        .await
    }

    async fn get_block(&self, query: BlockQuery) -> Result<Block, NodeError> {
        debug!(%query, "fetching block");
        let params = match query {
            BlockQuery::Height(height) => [
                ("requestType", "getBlock".to_string()),
                ("height", height.to_string()),
            ],
            BlockQuery::Id(id) => [
                ("requestType", "getBlock".to_string()),
                ("block", id.to_string()),
            ],
        };
        self.request(&params).await
    }
}

/// Pair an account with its resolved reward recipient.
///
/// A self-recipient reuses the subject without a second fetch. A failed
/// recipient lookup composes an absent recipient instead of failing the
/// operation.
pub async fn resolve_reward_recipient<A: ExplorerApi>(
    api: &A,
    account: Account,
) -> AccountWithRewardRecipient {
    let Some(recipient_id) = account.declared_reward_recipient() else {
        return AccountWithRewardRecipient {
            account,
            reward_recipient: None,
        };
    };

    if recipient_id == account.account {
        let recipient = account.clone();
        return AccountWithRewardRecipient {
            account,
            reward_recipient: Some(recipient),
        };
    }

    match api.get_account(recipient_id).await {
        Ok(recipient) => AccountWithRewardRecipient {
            account,
            reward_recipient: Some(recipient),
        },
        Err(e) => {
            warn!(
                account = %account.account,
                recipient = %recipient_id,
                "reward recipient lookup failed: {e}"
            );
            AccountWithRewardRecipient {
                account,
                reward_recipient: None,
            }
        }
    }
}

/// Fetch an account and enrich it with its reward recipient.
pub async fn fetch_account_with_reward_recipient<A: ExplorerApi>(
    api: &A,
    address: AccountId,
) -> Result<AccountWithRewardRecipient, NodeError> {
    let account = api.get_account(address).await?;
    Ok(resolve_reward_recipient(api, account).await)
}

/// Fetch a block and enrich it with its resolved generator. Unlike recipient
/// resolution, a failed generator fetch fails the whole operation.
pub async fn fetch_block_with_generator<A: ExplorerApi>(
    api: &A,
    query: BlockQuery,
) -> Result<BlockWithGenerator, NodeError> {
    let block = api.get_block(query).await?;
    let generator = api.get_account(block.generator).await?;
    let generator = resolve_reward_recipient(api, generator).await;
    Ok(BlockWithGenerator { block, generator })
}
