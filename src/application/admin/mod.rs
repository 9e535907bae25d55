//! Application services for the administrative surface.

pub mod editor;
pub mod post_list;

pub use editor::{AdminEditorError, AdminEditorService, EditorTarget, PostDraft};
pub use post_list::PostListManager;
