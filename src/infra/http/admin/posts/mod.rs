mod forms;
mod handlers;
mod panel;

pub(super) use handlers::{
    admin_post_delete, admin_post_drop, admin_post_move, admin_posts, admin_posts_panel,
    admin_posts_reload, admin_posts_reorder,
};
pub(super) use forms::AdminPostEditorForm;
pub(super) use panel::reload_working_list;
