//! Array-move reordering with global `order_index` reindexing.

use serde::Serialize;

use crate::domain::entities::PostRecord;

/// One `order_index` write produced by a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub id: String,
    pub order_index: i64,
}

/// Move `from` to `to` in place; records in between shift by one slot.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Rewrite every `order_index` to the record's zero-based position and
/// return the writes for records whose stored value changed.
pub fn reindex(posts: &mut [PostRecord]) -> Vec<OrderUpdate> {
    let mut updates = Vec::new();
    for (position, post) in posts.iter_mut().enumerate() {
        let position = position as i64;
        if post.order_index != position {
            post.order_index = position;
            updates.push(OrderUpdate {
                id: post.id.clone(),
                order_index: position,
            });
        }
    }
    updates
}

/// Move the record at `from` onto `to` within the full list and reindex.
pub fn move_and_reindex(posts: &mut Vec<PostRecord>, from: usize, to: usize) -> Vec<OrderUpdate> {
    array_move(posts, from, to);
    reindex(posts)
}
