use serde::Deserialize;

use crate::application::admin::{
    PostDraft,
    post_list::{ItemRect, MoveDirection, Point},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostPanelForm {
    pub(crate) bucket: Option<String>,
    pub(crate) search: Option<String>,
    pub(crate) page: Option<usize>,
    pub(crate) step: Option<String>,
    pub(crate) clear: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminPostReorderForm {
    pub(crate) moved: String,
    pub(crate) target: String,
}

/// Pointer release reported by the list script: where the pointer ended and
/// the rendered rows' boxes at that moment.
#[derive(Debug, Deserialize)]
pub(crate) struct AdminPostDropRequest {
    pub(crate) moved: String,
    pub(crate) pointer: Point,
    #[serde(default)]
    pub(crate) rects: Vec<ItemRect>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminPostMoveForm {
    pub(crate) direction: MoveDirection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostDeleteForm {
    pub(crate) confirm: Option<String>,
}

impl AdminPostDeleteForm {
    pub(crate) fn confirmed(&self) -> bool {
        is_checked(self.confirm.as_deref())
    }
}

/// Browser submission of the post editor. An unchecked `published` box is
/// simply absent from the body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostEditorForm {
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) excerpt: String,
    pub(crate) project_link: String,
    pub(crate) content: String,
    pub(crate) cover_image: String,
    pub(crate) published: Option<String>,
    #[serde(rename = "type")]
    pub(crate) post_type: String,
    pub(crate) category: String,
}

impl AdminPostEditorForm {
    pub(crate) fn into_draft(self) -> PostDraft {
        let published = is_checked(self.published.as_deref());
        PostDraft {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            project_link: self.project_link,
            content: self.content,
            cover_image: self.cover_image,
            published,
            post_type: self.post_type,
            category: self.category,
        }
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_confirmation_accepts_boolish_values() {
        for value in ["true", "1", "YES", " on "] {
            let form = AdminPostDeleteForm {
                confirm: Some(value.to_string()),
            };
            assert!(form.confirmed(), "{value} should confirm");
        }
        for value in [None, Some("false"), Some(""), Some("nope")] {
            let form = AdminPostDeleteForm {
                confirm: value.map(str::to_string),
            };
            assert!(!form.confirmed());
        }
    }

    #[test]
    fn editor_form_reads_the_published_checkbox() {
        let checked = AdminPostEditorForm {
            title: "Hello".into(),
            published: Some("on".into()),
            post_type: "project".into(),
            ..AdminPostEditorForm::default()
        }
        .into_draft();
        assert!(checked.published);
        assert_eq!(checked.title, "Hello");
        assert_eq!(checked.post_type, "project");

        let unchecked = AdminPostEditorForm::default().into_draft();
        assert!(!unchecked.published);
    }
}
