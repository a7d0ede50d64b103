use super::de;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an entity, assigned by the cluster bucket it was delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Website,
    Mule,
    Suspected,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Website => "website",
            Category::Mule => "mule",
            Category::Suspected => "suspected",
        }
    }
}

/// Keys of the three cluster buckets, in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKey {
    Websites,
    MuleAccounts,
    SuspectedDistribution,
}

impl ClusterKey {
    /// Fixed hierarchy order.
    pub const ALL: [ClusterKey; 3] = [
        ClusterKey::Websites,
        ClusterKey::MuleAccounts,
        ClusterKey::SuspectedDistribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClusterKey::Websites => "websites",
            ClusterKey::MuleAccounts => "mule_accounts",
            ClusterKey::SuspectedDistribution => "suspected_distribution",
        }
    }

    pub fn category(self) -> Category {
        match self {
            ClusterKey::Websites => Category::Website,
            ClusterKey::MuleAccounts => Category::Mule,
            ClusterKey::SuspectedDistribution => Category::Suspected,
        }
    }

    pub fn from_category(category: Category) -> Self {
        match category {
            Category::Website => ClusterKey::Websites,
            Category::Mule => ClusterKey::MuleAccounts,
            Category::Suspected => ClusterKey::SuspectedDistribution,
        }
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClusterKey(pub String);

impl fmt::Display for UnknownClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cluster key '{}'", self.0)
    }
}

impl std::error::Error for UnknownClusterKey {}

impl FromStr for ClusterKey {
    type Err = UnknownClusterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClusterKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownClusterKey(s.to_string()))
    }
}

/// A scored account or website as delivered by `/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub total_amount: f64,
    pub tx_count: u64,
    pub unique_senders: u64,
    pub unique_receivers: u64,
    #[serde(rename = "is_commission")]
    pub is_commission: bool,
    #[serde(rename = "fan_in_out_ratio")]
    pub fan_in_out_ratio: f64,
    pub category: Category,
}

impl Entity {
    /// Entity with zeroed metrics, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            total_amount: 0.0,
            tx_count: 0,
            unique_senders: 0,
            unique_receivers: 0,
            is_commission: false,
            fan_in_out_ratio: 0.0,
            category,
        }
    }

    /// Packing weight: the transaction count, or 1 when there were none.
    pub fn pack_value(&self) -> f64 {
        if self.tx_count > 0 {
            self.tx_count as f64
        } else {
            1.0
        }
    }
}

/// Wire shape of an entity before its bucket assigns a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    #[serde(default, deserialize_with = "de::string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    total_amount: f64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    tx_count: u64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    unique_senders: u64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    unique_receivers: u64,
    #[serde(default, rename = "is_commission", deserialize_with = "de::bool_or_false")]
    is_commission: bool,
    #[serde(default, rename = "fan_in_out_ratio", deserialize_with = "de::number_or_zero")]
    fan_in_out_ratio: f64,
}

impl RawEntity {
    fn categorize(self, category: Category) -> Option<Entity> {
        if self.id.trim().is_empty() {
            return None;
        }
        Some(Entity {
            id: self.id,
            total_amount: self.total_amount,
            tx_count: self.tx_count,
            unique_senders: self.unique_senders,
            unique_receivers: self.unique_receivers,
            is_commission: self.is_commission,
            fan_in_out_ratio: self.fan_in_out_ratio,
            category,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawClusterSet {
    #[serde(default, deserialize_with = "de::null_as_default")]
    websites: Vec<Option<RawEntity>>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    mule_accounts: Vec<Option<RawEntity>>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    suspected_distribution: Vec<Option<RawEntity>>,
}

/// The three cluster buckets. Missing buckets decode as empty and entities
/// without an id are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawClusterSet")]
pub struct ClusterSet {
    pub websites: Vec<Entity>,
    pub mule_accounts: Vec<Entity>,
    pub suspected_distribution: Vec<Entity>,
}

impl From<RawClusterSet> for ClusterSet {
    fn from(raw: RawClusterSet) -> Self {
        fn bucket(raw: Vec<Option<RawEntity>>, category: Category) -> Vec<Entity> {
            raw.into_iter()
                .flatten()
                .filter_map(|e| e.categorize(category))
                .collect()
        }

        Self {
            websites: bucket(raw.websites, Category::Website),
            mule_accounts: bucket(raw.mule_accounts, Category::Mule),
            suspected_distribution: bucket(raw.suspected_distribution, Category::Suspected),
        }
    }
}

impl ClusterSet {
    pub fn bucket(&self, key: ClusterKey) -> &[Entity] {
        match key {
            ClusterKey::Websites => &self.websites,
            ClusterKey::MuleAccounts => &self.mule_accounts,
            ClusterKey::SuspectedDistribution => &self.suspected_distribution,
        }
    }

    /// Buckets in hierarchy order.
    pub fn buckets(&self) -> impl Iterator<Item = (ClusterKey, &[Entity])> {
        ClusterKey::ALL.into_iter().map(|key| (key, self.bucket(key)))
    }

    pub fn total_entities(&self) -> usize {
        self.websites.len() + self.mule_accounts.len() + self.suspected_distribution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entities() == 0
    }

    /// Insert an entity into the bucket matching its category.
    pub fn push(&mut self, entity: Entity) {
        match entity.category {
            Category::Website => self.websites.push(entity),
            Category::Mule => self.mule_accounts.push(entity),
            Category::Suspected => self.suspected_distribution.push(entity),
        }
    }
}
