//! Admin post collection: buckets, search, pagination, drag reordering and
//! optimistic deletion over a single working list.

mod drag;
mod manager;
mod reorder;
mod state;
mod types;

pub use drag::{
    DragEnd, ItemRect, POINTER_ACTIVATION_DISTANCE, Point, closest_center, keyboard_target,
};
pub use manager::PostListManager;
pub use reorder::{OrderUpdate, array_move, move_and_reindex, reindex};
pub use state::PostListState;
pub use types::{
    AdminPostListError, BucketCount, Confirmation, DELETE_FAILED_ALERT, DELETE_PROMPT,
    DeleteOutcome, MoveDirection, Notifier, ReorderOutcome, VisiblePosts,
};
