// SPDX-License-Identifier: MIT
//
// The ordered image collection — insertion order is page order in the
// exported document. Mutations are append, remove-by-id, and
// swap-with-neighbour reordering; none of them mutate an item in place.

use crate::types::{ImageId, StagedImage};

/// Ordered sequence of staged images.
///
/// The aggregate size quota is enforced at intake, never retroactively:
/// the collection itself only does boundary-safe bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    items: Vec<StagedImage>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted image.
    pub fn push(&mut self, item: StagedImage) {
        self.items.push(item);
    }

    /// Append a settled intake batch in order. Appending (rather than
    /// replacing the collection wholesale) keeps removals and reorders
    /// made while the batch was being read.
    pub fn extend(&mut self, items: impl IntoIterator<Item = StagedImage>) {
        self.items.extend(items);
    }

    /// Remove the image with the given id. No-op if absent.
    pub fn remove(&mut self, id: ImageId) {
        self.items.retain(|item| item.id != id);
    }

    /// Swap the item at `index` with the one before it.
    /// No-op at index 0 or out of bounds — no wraparound.
    pub fn move_up(&mut self, index: usize) {
        if index == 0 || index >= self.items.len() {
            return;
        }
        self.items.swap(index, index - 1);
    }

    /// Swap the item at `index` with the one after it.
    /// No-op at the last index or out of bounds — no wraparound.
    pub fn move_down(&mut self, index: usize) {
        if index + 1 >= self.items.len() {
            return;
        }
        self.items.swap(index, index + 1);
    }

    /// Sum of declared byte sizes. Recomputed on demand; collections are
    /// small enough that caching would buy nothing.
    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|item| item.byte_size).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[StagedImage] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StagedImage> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn staged(size: u64) -> StagedImage {
        StagedImage::new(vec![0u8; size as usize], size, "image/png")
    }

    fn ids(c: &ImageCollection) -> Vec<ImageId> {
        c.items().iter().map(|i| i.id).collect()
    }

    #[test]
    fn total_size_sums_declared_sizes() {
        let mut c = ImageCollection::new();
        assert_eq!(c.total_size(), 0);
        c.push(staged(10));
        c.push(staged(32));
        assert_eq!(c.total_size(), 42);
    }

    #[test]
    fn extend_appends_in_order() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        c.extend(vec![staged(2), staged(3)]);
        let sizes: Vec<u64> = c.iter().map(|i| i.byte_size).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
    }

    #[test]
    fn remove_by_id() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        c.push(staged(2));
        let victim = c.items()[0].id;
        c.remove(victim);
        assert_eq!(c.len(), 1);
        assert_eq!(c.items()[0].byte_size, 2);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        let before = ids(&c);
        c.remove(ImageId(Uuid::new_v4()));
        assert_eq!(ids(&c), before);
    }

    #[test]
    fn remove_all_yields_empty() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        c.push(staged(2));
        for id in ids(&c) {
            c.remove(id);
        }
        assert!(c.is_empty());
        assert_eq!(c.total_size(), 0);
    }

    #[test]
    fn move_up_at_first_index_is_noop() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        c.push(staged(2));
        let before = ids(&c);
        c.move_up(0);
        assert_eq!(ids(&c), before);
    }

    #[test]
    fn move_down_at_last_index_is_noop() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        c.push(staged(2));
        let before = ids(&c);
        c.move_down(1);
        assert_eq!(ids(&c), before);
    }

    #[test]
    fn move_up_then_down_restores_order() {
        for index in 1..4usize {
            let mut c = ImageCollection::new();
            for size in 1..=4u64 {
                c.push(staged(size));
            }
            let before = ids(&c);
            c.move_up(index);
            assert_ne!(ids(&c), before);
            c.move_down(index - 1);
            assert_eq!(ids(&c), before);
        }
    }

    #[test]
    fn moves_out_of_bounds_are_noops() {
        let mut c = ImageCollection::new();
        c.push(staged(1));
        let before = ids(&c);
        c.move_up(7);
        c.move_down(7);
        assert_eq!(ids(&c), before);
    }
}
