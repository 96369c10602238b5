//! Learned value table shared between training and serving

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{tictactoe::Board, types::StateKey};

/// Sparse map from board keys to estimated returns
///
/// Keys are afterstates: the board right after a move, valued from the point
/// of view of the side that made it. States that were never visited have no
/// entry and read as [`ValueTable::default_value`].
///
/// Once training finishes the table is meant to be frozen (for instance moved
/// into an `Arc`) and only read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<StateKey, f64>,
    default_value: f64,
}

impl ValueTable {
    /// Create an empty table with a neutral default of 0.0
    pub fn new() -> Self {
        Self::with_default(0.0)
    }

    /// Create an empty table whose missing entries read as `default_value`
    pub fn with_default(default_value: f64) -> Self {
        Self {
            values: HashMap::new(),
            default_value,
        }
    }

    /// Estimated value for a key, or the default when unseen
    pub fn value(&self, key: StateKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(self.default_value)
    }

    /// Estimated value of a board
    pub fn board_value(&self, board: &Board) -> f64 {
        self.value(board.canonical_key())
    }

    /// Stored value for a key, `None` when the state was never visited
    pub fn get(&self, key: StateKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn set(&mut self, key: StateKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Move the entry for `key` a fraction `step` of the way toward `target`.
    ///
    /// An absent entry starts from the default value. Returns the new value.
    pub fn update_toward(&mut self, key: StateKey, target: f64, step: f64) -> f64 {
        let default_value = self.default_value;
        let entry = self.values.entry(key).or_insert(default_value);
        *entry += step * (target - *entry);
        *entry
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Number of visited states
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, f64)> + '_ {
        self.values.iter().map(|(&key, &value)| (key, value))
    }

    /// Smallest and largest stored value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.values().fold(None, |range, &v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Entries keyed by their 9-character board string, sorted, for export
    pub fn to_labeled(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(key, &value)| (key.to_string(), value))
            .collect()
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn test_missing_entries_read_as_default() {
        let table = ValueTable::with_default(0.25);
        assert_eq!(table.value(key("O........")), 0.25);
        assert_eq!(table.get(key("O........")), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut table = ValueTable::new();
        table.set(key("OX......."), 0.5);
        assert_eq!(table.value(key("OX.......")), 0.5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_toward_starts_from_default() {
        let mut table = ValueTable::with_default(0.5);
        let k = key("OX.......");

        assert_eq!(table.update_toward(k, 1.0, 0.5), 0.75);
        assert_eq!(table.update_toward(k, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_value_range() {
        let mut table = ValueTable::new();
        assert_eq!(table.value_range(), None);
        table.set(key("OX......."), -0.5);
        table.set(key("O.X......"), 0.75);
        assert_eq!(table.value_range(), Some((-0.5, 0.75)));
    }

    #[test]
    fn test_labeled_export_uses_board_strings() {
        let mut table = ValueTable::new();
        table.set(key("OX......."), 1.0);
        let labeled = table.to_labeled();
        assert_eq!(labeled.get("OX......."), Some(&1.0));
    }

    #[test]
    fn test_msgpack_roundtrip_preserves_values_exactly() {
        let mut table = ValueTable::with_default(0.0);
        table.set(key("OX......."), 0.1 + 0.2);
        table.set(key("O.X......"), -1.0 / 3.0);

        let bytes = rmp_serde::to_vec(&table).unwrap();
        let back: ValueTable = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, table);
    }
}
