//! Ordered solution collection.

use super::types::Solution;
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

/// An ordered, appendable collection of solutions.
///
/// Insertion order carries no meaning for the algorithms but is kept
/// stable so that ranking and crowding tie-breaks are deterministic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population<V> {
    solutions: Vec<Solution<V>>,
}

impl<V> Default for Population<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Population<V> {
    pub fn new() -> Self {
        Self {
            solutions: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            solutions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, solution: Solution<V>) {
        self.solutions.push(solution);
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Solution<V>> {
        self.solutions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution<V>> {
        self.solutions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Solution<V>> {
        self.solutions.iter_mut()
    }

    pub fn as_slice(&self) -> &[Solution<V>] {
        &self.solutions
    }

    pub fn as_mut_slice(&mut self) -> &mut [Solution<V>] {
        &mut self.solutions
    }

    /// Concatenates `other` after `self`. Duplicates are kept.
    pub fn union(mut self, other: Population<V>) -> Population<V> {
        self.solutions.extend(other.solutions);
        self
    }

    /// Stable in-place sort with an injected comparator.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Solution<V>, &Solution<V>) -> Ordering,
    {
        self.solutions.sort_by(compare);
    }

    pub fn remove(&mut self, index: usize) -> Solution<V> {
        self.solutions.remove(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.solutions.truncate(len);
    }

    pub fn clear(&mut self) {
        self.solutions.clear();
    }

    /// Objective vectors of every member, in population order.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.solutions.iter().map(|s| s.objectives().to_vec()).collect()
    }

    pub fn into_vec(self) -> Vec<Solution<V>> {
        self.solutions
    }
}

impl<V> From<Vec<Solution<V>>> for Population<V> {
    fn from(solutions: Vec<Solution<V>>) -> Self {
        Self { solutions }
    }
}

impl<V> FromIterator<Solution<V>> for Population<V> {
    fn from_iter<T: IntoIterator<Item = Solution<V>>>(iter: T) -> Self {
        Self {
            solutions: iter.into_iter().collect(),
        }
    }
}

impl<V> Extend<Solution<V>> for Population<V> {
    fn extend<T: IntoIterator<Item = Solution<V>>>(&mut self, iter: T) {
        self.solutions.extend(iter);
    }
}

impl<V> IntoIterator for Population<V> {
    type Item = Solution<V>;
    type IntoIter = std::vec::IntoIter<Solution<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Population<V> {
    type Item = &'a Solution<V>;
    type IntoIter = std::slice::Iter<'a, Solution<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl<V> Index<usize> for Population<V> {
    type Output = Solution<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.solutions[index]
    }
}

impl<V> IndexMut<usize> for Population<V> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.solutions[index]
    }
}
