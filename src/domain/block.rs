use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::account::{AccountId, AccountWithRewardRecipient};
use super::de;

/// Unix timestamp of the Burst genesis block. Node timestamps count seconds
/// from this epoch.
pub const BURST_EPOCH_OFFSET: u64 = 1_407_722_400;

/// Numeric block identifier, serialized as the decimal string the node API
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(BlockId)
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        de::u64_from_str_or_num(deserializer).map(BlockId)
    }
}

/// Key for a block detail screen: a block is looked up either by height or
/// by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockQuery {
    Height(u64),
    Id(BlockId),
}

impl BlockQuery {
    /// Build a query from launch parameters. The id wins when both are
    /// supplied; no parameters means no screen can be opened.
    pub fn from_params(height: Option<u64>, id: Option<BlockId>) -> Option<Self> {
        match (id, height) {
            (Some(id), _) => Some(BlockQuery::Id(id)),
            (None, Some(height)) => Some(BlockQuery::Height(height)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for BlockQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockQuery::Height(height) => write!(f, "height {height}"),
            BlockQuery::Id(id) => write!(f, "block {id}"),
        }
    }
}

/// Immutable block snapshot fetched from the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "block")]
    pub block_id: BlockId,
    pub height: u64,
    /// Seconds since the Burst epoch.
    pub timestamp: u64,
    #[serde(default)]
    pub number_of_transactions: u32,
    #[serde(
        rename = "totalAmountNQT",
        default,
        deserialize_with = "de::u64_from_str_or_num"
    )]
    pub total_amount_nqt: u64,
    #[serde(
        rename = "totalFeeNQT",
        default,
        deserialize_with = "de::u64_from_str_or_num"
    )]
    pub total_fee_nqt: u64,
    #[serde(default)]
    pub payload_length: u32,
    pub generator: AccountId,
}

impl Block {
    pub fn unix_timestamp(&self) -> u64 {
        BURST_EPOCH_OFFSET + self.timestamp
    }
}

/// A block paired with its resolved generator (itself enriched with its
/// reward recipient).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockWithGenerator {
    pub block: Block,
    pub generator: AccountWithRewardRecipient,
}
