use std::sync::Arc;

use crate::application::{
    admin::{AdminEditorService, PostListManager},
    repos::PostsRepo,
};

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<dyn PostsRepo>,
    pub list: Arc<PostListManager>,
    pub editor: Arc<AdminEditorService>,
}
