use askama::Template;

use crate::application::admin::{
    EditorTarget, PostDraft,
    post_list::{BucketCount, DELETE_PROMPT, POINTER_ACTIVATION_DISTANCE, VisiblePosts},
};
use crate::domain::{
    entities::PostRecord,
    posts::{
        Bucket, DEFAULT_CATEGORY, DEFAULT_POST_TYPE, PROJECT_TYPE, STRAIGHT_TALK_CATEGORY,
        is_project,
    },
};
use crate::presentation::views::display_date;

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub title: String,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(title: impl Into<String>, content: T) -> Self {
        Self {
            title: title.into(),
            asset_version: env!("CARGO_PKG_VERSION").to_string(),
            content,
        }
    }
}

#[derive(Clone)]
pub struct AdminToastItem {
    pub id: String,
    pub kind: &'static str,
    pub text: String,
}

#[derive(Clone)]
pub struct AdminBucketTabView {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminPostRowView {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub is_project: bool,
    pub status_label: &'static str,
    pub is_published: bool,
    pub created: String,
    pub order_index: i64,
    pub edit_href: String,
    pub public_href: String,
    pub move_action: String,
    pub delete_action: String,
    pub is_first: bool,
    pub is_last: bool,
}

#[derive(Clone)]
pub struct AdminPaginationView {
    pub label: String,
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Clone)]
pub struct AdminPostListView {
    pub tabs: Vec<AdminBucketTabView>,
    pub rows: Vec<AdminPostRowView>,
    pub active_bucket: &'static str,
    pub search: String,
    pub total_items: usize,
    pub pagination: Option<AdminPaginationView>,
    pub empty_message: String,
    pub toasts: Vec<AdminToastItem>,
    pub delete_prompt: &'static str,
    pub activation_distance: f64,
    pub panel_action: &'static str,
    pub reorder_action: &'static str,
    pub drop_action: &'static str,
    pub reload_action: &'static str,
    pub new_post_href: &'static str,
}

impl AdminPostListView {
    pub fn from_visible(visible: &VisiblePosts, toasts: Vec<AdminToastItem>) -> Self {
        let window = visible.window;
        let last = visible.items.len().saturating_sub(1);
        let rows = visible
            .items
            .iter()
            .enumerate()
            .map(|(position, post)| row_view(post, position == 0, position == last))
            .collect();

        let pagination = window.is_paginated().then(|| AdminPaginationView {
            label: format!("Page {} of {}", window.page, window.total_pages),
            page: window.page,
            total_pages: window.total_pages,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
        });

        let empty_message = if visible.search.trim().is_empty() {
            format!("No posts in {} yet.", visible.bucket.label())
        } else {
            format!("No posts in {} match \"{}\".", visible.bucket.label(), visible.search.trim())
        };

        Self {
            tabs: visible
                .counts
                .iter()
                .map(|count| tab_view(count, visible.bucket))
                .collect(),
            rows,
            active_bucket: visible.bucket.as_str(),
            search: visible.search.clone(),
            total_items: window.total_items,
            pagination,
            empty_message,
            toasts,
            delete_prompt: DELETE_PROMPT,
            activation_distance: POINTER_ACTIVATION_DISTANCE,
            panel_action: "/posts/panel",
            reorder_action: "/posts/reorder",
            drop_action: "/posts/drop",
            reload_action: "/posts/reload",
            new_post_href: "/posts/new/edit",
        }
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

fn tab_view(count: &BucketCount, active: Bucket) -> AdminBucketTabView {
    AdminBucketTabView {
        key: count.bucket.as_str(),
        label: count.bucket.label(),
        count: count.count,
        is_active: count.bucket == active,
    }
}

fn row_view(post: &PostRecord, is_first: bool, is_last: bool) -> AdminPostRowView {
    AdminPostRowView {
        id: post.id.clone(),
        title: post.title.clone(),
        excerpt: non_blank_or(post.excerpt_or_empty(), "No excerpt"),
        category: non_blank_or(post.category_str().unwrap_or_default(), "Uncategorized"),
        is_project: is_project(post),
        status_label: if post.published { "Published" } else { "Draft" },
        is_published: post.published,
        created: display_date(post.created_at),
        order_index: post.order_index,
        edit_href: format!("/posts/{}/edit", post.id),
        public_href: format!("/blog/{}", post.slug),
        move_action: format!("/posts/{}/move", post.id),
        delete_action: format!("/posts/{}/delete", post.id),
        is_first,
        is_last,
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Clone)]
pub struct AdminSelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn select_options(choices: &[(&str, &str)], current: &str) -> Vec<AdminSelectOption> {
    let mut options: Vec<_> = choices
        .iter()
        .map(|(value, label)| AdminSelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: *value == current,
        })
        .collect();
    if !current.is_empty() && !options.iter().any(|option| option.selected) {
        options.push(AdminSelectOption {
            value: current.to_string(),
            label: current.to_string(),
            selected: true,
        });
    }
    options
}

/// The post editor form, filled from a draft and pointed at the save route
/// for its target.
#[derive(Clone)]
pub struct AdminPostEditorView {
    pub heading: &'static str,
    pub action: String,
    pub draft: PostDraft,
    pub is_project: bool,
    pub type_options: Vec<AdminSelectOption>,
    pub category_options: Vec<AdminSelectOption>,
    pub toasts: Vec<AdminToastItem>,
    pub back_href: &'static str,
}

impl AdminPostEditorView {
    pub fn new(target: &EditorTarget, draft: PostDraft, toasts: Vec<AdminToastItem>) -> Self {
        let (heading, action) = match target {
            EditorTarget::New => ("New post", "/posts/new".to_string()),
            EditorTarget::Existing(id) => ("Edit post", format!("/posts/{id}")),
        };
        let type_options = select_options(
            &[(DEFAULT_POST_TYPE, "Blog Post"), (PROJECT_TYPE, "Project")],
            &draft.post_type,
        );
        let category_options = select_options(
            &[
                (STRAIGHT_TALK_CATEGORY, STRAIGHT_TALK_CATEGORY),
                (DEFAULT_CATEGORY, DEFAULT_CATEGORY),
            ],
            &draft.category,
        );

        Self {
            heading,
            action,
            is_project: draft.post_type == PROJECT_TYPE,
            draft,
            type_options,
            category_options,
            toasts,
            back_href: "/posts",
        }
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminPostEditorTemplate {
    pub view: AdminLayout<AdminPostEditorView>,
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: AdminLayout<AdminPostListView>,
}

#[derive(Template)]
#[template(path = "admin/posts_panel.html")]
pub struct AdminPostsPanelTemplate {
    pub content: AdminPostListView,
}
