//! Asset quantities and multi-asset values.
//!
//! A ledger value is a quantity of the base currency plus any number of
//! native token quantities. `Asset` is a single (unit, quantity) pair as it
//! appears in an output; `Value` aggregates assets per unit for arithmetic
//! and comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit sentinel for the base currency.
pub const LOVELACE: &str = "lovelace";

/// Length of a minting policy id, in hex characters. Token units are the
/// policy id immediately followed by the hex-encoded asset name.
pub const POLICY_ID_LENGTH: usize = 56;

/// A quantity of a single asset unit.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Asset {
    /// `lovelace`, or a policy id followed by the hex asset name.
    pub unit: String,
    /// Quantity held or requested. Never negative.
    pub quantity: u64,
}

impl Asset {
    /// Instantiate a new asset.
    pub fn new(unit: impl Into<String>, quantity: u64) -> Self {
        Self {
            unit: unit.into(),
            quantity,
        }
    }

    /// Shortcut for a base-currency quantity.
    pub fn lovelace(quantity: u64) -> Self {
        Self::new(LOVELACE, quantity)
    }

    /// Split a token unit into its policy id and asset name halves.
    pub fn parse_unit(unit: &str) -> (&str, &str) {
        unit.split_at(POLICY_ID_LENGTH.min(unit.len()))
    }
}

/// A multi-asset value: unit mapped to quantity, in lexicographic unit order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
#[serde(transparent)]
pub struct Value(BTreeMap<String, u64>);

impl Value {
    /// An empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no unit has a nonzero quantity.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The quantity held for `unit`, zero if absent.
    pub fn quantity_of(&self, unit: &str) -> u64 {
        self.0.get(unit).copied().unwrap_or(0)
    }

    /// Add `quantity` of `unit` to this value.
    pub fn add(&mut self, unit: &str, quantity: u64) {
        if quantity == 0 {
            return;
        }
        let entry = self.0.entry(unit.to_owned()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Fold a sequence of assets into this value.
    pub fn extend_assets<'a, I>(&mut self, assets: I)
    where
        I: IntoIterator<Item = &'a Asset>,
    {
        for asset in assets {
            self.add(&asset.unit, asset.quantity);
        }
    }

    /// Build a value from a sequence of assets.
    pub fn from_assets<'a, I>(assets: I) -> Self
    where
        I: IntoIterator<Item = &'a Asset>,
    {
        let mut value = Self::new();
        value.extend_assets(assets);
        value
    }

    /// Iterate (unit, quantity) pairs in lexicographic unit order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(unit, quantity)| (unit.as_str(), *quantity))
    }

    /// True if this value holds at least `other`'s quantity of every unit.
    pub fn geq(&self, other: &Value) -> bool {
        other
            .iter()
            .all(|(unit, quantity)| self.quantity_of(unit) >= quantity)
    }
}

impl FromIterator<Asset> for Value {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut value = Self::new();
        for asset in iter {
            value.add(&asset.unit, asset.quantity);
        }
        value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_aggregates_assets_per_unit() {
        let value = Value::from_assets(&[
            Asset::lovelace(1_000_000),
            Asset::new("aa".repeat(28) + "abcd", 5),
            Asset::lovelace(2_000_000),
        ]);
        assert_eq!(value.quantity_of(LOVELACE), 3_000_000);
        assert_eq!(value.quantity_of(&("aa".repeat(28) + "abcd")), 5);
        assert_eq!(value.quantity_of("missing"), 0);
    }

    #[test]
    fn it_iterates_units_lexicographically() {
        let mut value = Value::new();
        value.add("zz", 1);
        value.add(LOVELACE, 1);
        value.add("aa", 1);
        let units: Vec<_> = value.iter().map(|(unit, _)| unit.to_owned()).collect();
        assert_eq!(units, vec!["aa", "lovelace", "zz"]);
    }

    #[test]
    fn it_compares_values_per_unit() {
        let mut have = Value::new();
        have.add(LOVELACE, 10);
        have.add("tok", 3);
        let mut need = Value::new();
        need.add(LOVELACE, 10);
        assert!(have.geq(&need));
        need.add("tok", 4);
        assert!(!have.geq(&need));
        assert!(have.geq(&Value::new()));
    }

    #[test]
    fn it_splits_token_units() {
        let policy = "ab".repeat(28);
        let unit = format!("{policy}746f6b656e");
        let (policy_id, asset_name) = Asset::parse_unit(&unit);
        assert_eq!(policy_id, policy);
        assert_eq!(asset_name, "746f6b656e");
    }
}
