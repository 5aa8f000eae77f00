//! Multi-key ordering of root items.

use std::cmp::Ordering;

use crate::item::EditItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    State,
    Key,
    Source,
    Translation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortDescriptor {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortDescriptor {
    #[must_use]
    pub const fn ascending(key: SortKey) -> Self {
        Self { key, order: SortOrder::Ascending }
    }

    #[must_use]
    pub const fn descending(key: SortKey) -> Self {
        Self { key, order: SortOrder::Descending }
    }

    fn compare(self, a: &EditItem, b: &EditItem) -> Ordering {
        let ordering = match self.key {
            SortKey::State => a.state().cmp(&b.state()),
            SortKey::Key => a.key.cmp(&b.key),
            SortKey::Source => a.source_string.cmp(&b.source_string),
            SortKey::Translation => a.translation.cmp(&b.translation),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Ordered list of sort descriptors; earlier descriptors take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub descriptors: Vec<SortDescriptor>,
}

impl Default for SortSpec {
    /// State first, then key.
    fn default() -> Self {
        Self::new(vec![
            SortDescriptor::ascending(SortKey::State),
            SortDescriptor::ascending(SortKey::Key),
        ])
    }
}

impl SortSpec {
    #[must_use]
    pub const fn new(descriptors: Vec<SortDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Adds a key tiebreak to a state-only sort so ties have a fixed order.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut descriptors = self.descriptors.clone();
        if let [only] = descriptors.as_slice()
            && only.key == SortKey::State
        {
            descriptors.push(SortDescriptor::ascending(SortKey::Key));
        }
        Self { descriptors }
    }

    #[must_use]
    pub fn compare(&self, a: &EditItem, b: &EditItem) -> Ordering {
        self.descriptors
            .iter()
            .map(|descriptor| descriptor.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort of `items` after normalization.
    pub fn sort(&self, items: &mut [&EditItem]) {
        let spec = self.normalized();
        items.sort_by(|a, b| spec.compare(a, b));
    }
}
