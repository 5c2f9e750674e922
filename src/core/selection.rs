use std::collections::BTreeSet;

use itertools::Itertools;

/// Separator of the serialized selection, as expected by the `hotels` query parameter.
pub const KEY_SEPARATOR: &str = "|";

/// Active subset of the eligible hotels.
///
/// The selection is always a subset of the universe. Whether everything is selected is derived
/// from the sizes, there is no separately stored flag to go stale.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    /// Eligible hotel identifiers, sorted ascending.
    universe: Vec<String>,

    selected: BTreeSet<String>,
}

impl SelectionSet {
    /// Load the universe, with everything selected.
    pub fn new(universe: impl IntoIterator<Item = String>) -> Self {
        let universe = universe.into_iter().sorted().dedup().collect_vec();
        let selected = universe.iter().cloned().collect();
        Self { universe, selected }
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn is_all_selected(&self) -> bool {
        self.selected.len() == self.universe.len()
    }

    pub fn select_all(&mut self) {
        self.selected = self.universe.iter().cloned().collect();
    }

    pub fn unselect_all(&mut self) {
        self.selected.clear();
    }

    /// Flip the membership of the hotel.
    ///
    /// Returns `false` and leaves the selection untouched if the hotel is not eligible.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.universe.binary_search_by(|known| known.as_str().cmp(id)).is_err() {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_owned());
        }
        true
    }

    /// Replace the selection with exactly the given hotels and return those that are not eligible.
    pub fn select_only<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        self.unselect_all();
        ids.into_iter().filter(|id| !self.contains(id) && !self.toggle(id)).collect()
    }

    /// Pipe-joined selection, used as the query parameter and as the re-fetch key.
    #[must_use]
    pub fn key(&self) -> String {
        self.selected.iter().join(KEY_SEPARATOR)
    }
}
