use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::de;

/// Number of NQT (planck) per whole BURST.
pub const NQT_PER_BURST: u64 = 100_000_000;

/// Numeric account identifier, serialized as the decimal string the node
/// API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub u64);

impl AccountId {
    /// The "no account" sentinel the node uses for unset relationships.
    pub const ZERO: AccountId = AccountId(0);
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(AccountId)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        de::u64_from_str_or_num(deserializer).map(AccountId)
    }
}

/// Immutable account snapshot fetched from the node.
///
/// Balances are NQT string fields on the wire; unset name/description come
/// back as empty strings and are normalized to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account: AccountId,
    #[serde(rename = "accountRS", default)]
    pub account_rs: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default, deserialize_with = "de::opt_non_empty")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_non_empty")]
    pub description: Option<String>,
    #[serde(rename = "balanceNQT", default, deserialize_with = "de::u64_from_str_or_num")]
    pub balance_nqt: u64,
    #[serde(
        rename = "forgedBalanceNQT",
        default,
        deserialize_with = "de::u64_from_str_or_num"
    )]
    pub forged_balance_nqt: u64,
    #[serde(rename = "rewardRecipient", default)]
    pub reward_recipient: Option<AccountId>,
}

impl Account {
    /// The configured reward recipient, with the zero sentinel mapped to
    /// "not set".
    pub fn declared_reward_recipient(&self) -> Option<AccountId> {
        self.reward_recipient.filter(|id| *id != AccountId::ZERO)
    }

    /// Preferred display form of the address: the RS address when the node
    /// supplied one, the numeric id otherwise.
    pub fn display_address(&self) -> String {
        if self.account_rs.is_empty() {
            self.account.to_string()
        } else {
            self.account_rs.clone()
        }
    }
}

/// An account paired with its resolved reward recipient.
///
/// The recipient is absent when none is configured or when its resolution
/// failed; resolution failure never fails the account fetch itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountWithRewardRecipient {
    pub account: Account,
    pub reward_recipient: Option<Account>,
}

impl AccountWithRewardRecipient {
    pub fn recipient_is_self(&self) -> bool {
        self.reward_recipient
            .as_ref()
            .is_some_and(|r| r.account == self.account.account)
    }

    /// Resolved display name of the recipient, if the recipient resolved and
    /// has a name set.
    pub fn recipient_name(&self) -> Option<&str> {
        self.reward_recipient
            .as_ref()
            .and_then(|r| r.name.as_deref())
    }
}

/// Format an NQT amount as whole BURST with eight decimal places.
pub fn format_nqt(nqt: u64) -> String {
    format!("{}.{:08} BURST", nqt / NQT_PER_BURST, nqt % NQT_PER_BURST)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account_json() -> &'static str {
        r#"{
            "account": "8525774133626822245",
            "accountRS": "BURST-W5YR-ZZQC-KUBJ-G78KB",
            "publicKey": "a1b2c3",
            "name": "pool.burstcoin.ro",
            "description": "",
            "balanceNQT": "1470000000",
            "forgedBalanceNQT": "0",
            "rewardRecipient": "12345",
            "unconfirmedBalanceNQT": "1470000000",
            "requestProcessingTime": 1
        }"#
    }

    #[test]
    fn parses_account_response() {
        let account: Account = serde_json::from_str(sample_account_json()).unwrap();
        assert_eq!(account.account, AccountId(8525774133626822245));
        assert_eq!(account.account_rs, "BURST-W5YR-ZZQC-KUBJ-G78KB");
        assert_eq!(account.name.as_deref(), Some("pool.burstcoin.ro"));
        assert_eq!(account.description, None, "empty string normalizes to None");
        assert_eq!(account.balance_nqt, 1_470_000_000);
        assert_eq!(account.forged_balance_nqt, 0);
        assert_eq!(account.declared_reward_recipient(), Some(AccountId(12345)));
    }

    #[test]
    fn missing_optional_fields_default() {
        let account: Account =
            serde_json::from_str(r#"{"account": "42", "balanceNQT": "7"}"#).unwrap();
        assert_eq!(account.account, AccountId(42));
        assert_eq!(account.public_key, None);
        assert_eq!(account.name, None);
        assert_eq!(account.reward_recipient, None);
        assert_eq!(account.declared_reward_recipient(), None);
        assert_eq!(account.display_address(), "42");
    }

    #[test]
    fn zero_recipient_is_the_unset_sentinel() {
        let account: Account =
            serde_json::from_str(r#"{"account": "42", "rewardRecipient": "0"}"#).unwrap();
        assert_eq!(account.reward_recipient, Some(AccountId::ZERO));
        assert_eq!(account.declared_reward_recipient(), None);
    }

    #[test]
    fn account_id_round_trips_as_string() {
        let id: AccountId = serde_json::from_str(r#""8525774133626822245""#).unwrap();
        assert_eq!(id, AccountId(8525774133626822245));
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""8525774133626822245""#);
        assert_eq!("  42 ".parse::<AccountId>().unwrap(), AccountId(42));
        assert!("not-a-number".parse::<AccountId>().is_err());
    }

    #[test]
    fn formats_nqt() {
        assert_eq!(format_nqt(0), "0.00000000 BURST");
        assert_eq!(format_nqt(1), "0.00000001 BURST");
        assert_eq!(format_nqt(1_470_000_000), "14.70000000 BURST");
    }
}
