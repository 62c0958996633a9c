#![forbid(unsafe_code)]

//! Recipe state owned by the recipe page.
//!
//! A recipe is an ordered list of [`RecipeEntry`] values plus a [`LockSet`]
//! of row indices. Locked rows keep their quantity whenever sibling
//! quantities are recomputed; every mutator on [`RecipeState`] upholds that.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Quantity of one ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Amount {
    /// Absolute weight in the configured unit.
    Weight(f64),
    /// Share of the recipe, in percent.
    Percentage(f64),
}

impl Amount {
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Weight(v) | Self::Percentage(v) => v,
        }
    }
}

/// One line of the recipe: `{"id": "olive-oil", "weight": 300}` or
/// `{"id": "olive-oil", "percentage": 60}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub id: String,
    #[serde(flatten)]
    pub amount: Amount,
}

impl RecipeEntry {
    #[must_use]
    pub fn weight(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            amount: Amount::Weight(weight),
        }
    }

    #[must_use]
    pub fn percentage(id: impl Into<String>, percentage: f64) -> Self {
        Self {
            id: id.into(),
            amount: Amount::Percentage(percentage),
        }
    }
}

/// Indices of rows whose quantity must not be recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockSet(BTreeSet<usize>);

impl LockSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Flip the lock on `index`. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.0.remove(&index) {
            false
        } else {
            self.0.insert(index);
            true
        }
    }

    /// Forget `index` and shift every later lock down by one.
    pub fn remove_shift(&mut self, index: usize) {
        self.0 = self
            .0
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// The recipe being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeState {
    entries: Vec<RecipeEntry>,
    locks: LockSet,
}

impl RecipeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: Vec<RecipeEntry>) -> Self {
        Self {
            entries,
            locks: LockSet::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[RecipeEntry] {
        &self.entries
    }

    #[must_use]
    pub fn locks(&self) -> &LockSet {
        &self.locks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        self.locks.contains(index)
    }

    /// Append an entry. Returns its index.
    pub fn add(&mut self, entry: RecipeEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove the row at `index`, shifting later locks down.
    pub fn remove(&mut self, index: usize) -> Option<RecipeEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.locks.remove_shift(index);
        Some(self.entries.remove(index))
    }

    /// Set the weight of one row. Negative input is stored as zero.
    pub fn set_weight(&mut self, index: usize, weight: f64) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        entry.amount = Amount::Weight(weight.max(0.0));
        true
    }

    /// Set the percentage of one row and rebalance the other unlocked rows
    /// so the recipe still sums to 100%.
    ///
    /// The new value is clamped to what the other locked rows leave free.
    /// The remainder is shared among unlocked siblings in proportion to their
    /// current share, or evenly when they are all zero.
    pub fn set_percentage(&mut self, index: usize, percentage: f64) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let locked_others: f64 = self
            .locks
            .iter()
            .filter(|&i| i != index)
            .filter_map(|i| self.entries.get(i))
            .map(|e| e.amount.value())
            .sum();
        let available = (100.0 - locked_others).max(0.0);
        let value = percentage.clamp(0.0, available);
        self.entries[index].amount = Amount::Percentage(value);

        let free: Vec<usize> = (0..self.entries.len())
            .filter(|&i| i != index && !self.locks.contains(i))
            .collect();
        if free.is_empty() {
            return true;
        }
        let remainder = available - value;
        let current: f64 = free.iter().map(|&i| self.entries[i].amount.value()).sum();
        for &i in &free {
            let share = if current > 0.0 {
                remainder * self.entries[i].amount.value() / current
            } else {
                remainder / free.len() as f64
            };
            self.entries[i].amount = Amount::Percentage(share);
        }
        tracing::debug!(index, value, rebalanced = free.len(), "recipe.percentage");
        true
    }

    /// Flip the lock on `index`. Out-of-range indices are ignored.
    pub fn toggle_lock(&mut self, index: usize) -> Option<bool> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.locks.toggle(index))
    }

    /// Scale unlocked weights so the recipe totals `target`. Locked rows
    /// keep their weight; returns `false` when nothing can be scaled.
    pub fn scale_unlocked_to(&mut self, target: f64) -> bool {
        let locked: f64 = self
            .locks
            .iter()
            .filter_map(|i| self.entries.get(i))
            .map(|e| weight_of(e))
            .sum();
        let free: f64 = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.locks.contains(*i))
            .map(|(_, e)| weight_of(e))
            .sum();
        if free <= 0.0 {
            return false;
        }
        let factor = (target - locked).max(0.0) / free;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if self.locks.contains(i) {
                continue;
            }
            if let Amount::Weight(w) = entry.amount {
                entry.amount = Amount::Weight(w * factor);
            }
        }
        true
    }

    /// Sum of all weight rows.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(weight_of).sum()
    }

    /// Share of each row in percent, in display order. Weight rows are
    /// measured against the total weight; percentage rows report their own
    /// value.
    #[must_use]
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total_weight();
        self.entries
            .iter()
            .map(|e| match e.amount {
                Amount::Weight(w) if total > 0.0 => w / total * 100.0,
                Amount::Weight(_) => 0.0,
                Amount::Percentage(p) => p,
            })
            .collect()
    }
}

fn weight_of(entry: &RecipeEntry) -> f64 {
    match entry.amount {
        Amount::Weight(w) => w,
        Amount::Percentage(_) => 0.0,
    }
}
