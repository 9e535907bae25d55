use crate::application::error::{ErrorReport, HttpError};
use crate::application::site::{
    HomeFeed, HomeSection, PostPage, ProjectsCarousel, SiteProfile, cover_or_fallback,
};
use crate::domain::{entities::PostRecord, posts::is_project};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, macros::format_description};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: SiteChrome) -> Response {
    let meta = PageMetaView::titled(format!("Not found | {}", chrome.author));
    let view = LayoutContext::new(chrome, meta, ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

pub(crate) fn display_date(value: OffsetDateTime) -> String {
    value
        .format(format_description!(
            "[month repr:long] [day padding:none], [year]"
        ))
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: &'static str,
    pub href: &'static str,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct SiteChrome {
    pub author: String,
    pub navigation: Vec<NavigationLinkView>,
}

impl SiteChrome {
    pub fn new(profile: &SiteProfile, active_path: &str) -> Self {
        let navigation = [("Home", "/"), ("Projects", "/projects"), ("About", "/about")]
            .into_iter()
            .map(|(label, href)| NavigationLinkView {
                label,
                href,
                is_active: href == active_path,
            })
            .collect();
        Self {
            author: profile.author.clone(),
            navigation,
        }
    }
}

#[derive(Clone, Default)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub og_type: Option<&'static str>,
    pub published_time: Option<String>,
    pub image: Option<String>,
}

impl PageMetaView {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub chrome: SiteChrome,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: SiteChrome, meta: PageMetaView, content: T) -> Self {
        Self {
            chrome,
            meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub date: String,
    pub iso_date: String,
    pub cover_image: Option<String>,
}

impl From<&PostRecord> for PostCard {
    fn from(post: &PostRecord) -> Self {
        Self {
            href: format!("/blog/{}", post.slug),
            title: post.title.clone(),
            excerpt: post.excerpt_or_empty().to_string(),
            category: post.category_str().unwrap_or_default().to_string(),
            date: display_date(post.created_at),
            iso_date: post
                .created_at
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            cover_image: post
                .cover_image
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct HomeSectionView {
    pub title: &'static str,
    pub featured: Option<PostCard>,
    pub sidebar: Vec<PostCard>,
    pub all: Vec<PostCard>,
}

impl HomeSectionView {
    fn new(title: &'static str, section: &HomeSection) -> Self {
        Self {
            title,
            featured: section.featured.as_ref().map(PostCard::from),
            sidebar: section.sidebar.iter().map(PostCard::from).collect(),
            all: section.all.iter().map(PostCard::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct HomeView {
    pub straight_talk: HomeSectionView,
    pub blogs: HomeSectionView,
    pub grid: Vec<PostCard>,
}

impl From<&HomeFeed> for HomeView {
    fn from(feed: &HomeFeed) -> Self {
        Self {
            straight_talk: HomeSectionView::new("Straight Talk", &feed.straight_talk),
            blogs: HomeSectionView::new("Blogs", &feed.blogs),
            grid: feed.grid.iter().map(PostCard::from).collect(),
        }
    }
}

impl HomeView {
    pub fn sections(&self) -> [&HomeSectionView; 2] {
        [&self.straight_talk, &self.blogs]
    }

    pub fn is_empty(&self) -> bool {
        self.straight_talk.all.is_empty() && self.blogs.all.is_empty()
    }
}

#[derive(Clone)]
pub struct ProjectSlideView {
    pub title: String,
    pub excerpt: String,
    pub cover_image: String,
    pub href: String,
    pub project_link: Option<String>,
}

impl From<&PostRecord> for ProjectSlideView {
    fn from(project: &PostRecord) -> Self {
        Self {
            title: project.title.clone(),
            excerpt: project.excerpt_or_empty().to_string(),
            cover_image: cover_or_fallback(project).to_string(),
            href: format!("/blog/{}", project.slug),
            project_link: project
                .project_link
                .clone()
                .filter(|link| !link.trim().is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct ProjectsView {
    pub current: Option<ProjectSlideView>,
    pub projects: Vec<ProjectSlideView>,
    pub position: String,
    pub previous_href: String,
    pub next_href: String,
    pub has_many: bool,
}

impl From<&ProjectsCarousel> for ProjectsView {
    fn from(carousel: &ProjectsCarousel) -> Self {
        let total = carousel.projects.len();
        Self {
            current: carousel.current().map(ProjectSlideView::from),
            projects: carousel.projects.iter().map(ProjectSlideView::from).collect(),
            position: format!("{} / {}", carousel.current + 1, total.max(1)),
            previous_href: format!("/projects?index={}", carousel.previous_index()),
            next_href: format!("/projects?index={}", carousel.next_index()),
            has_many: total > 1,
        }
    }
}

#[derive(Clone)]
pub struct PostDetailView {
    pub title: String,
    pub category: String,
    pub date: String,
    pub excerpt: String,
    pub body_html: String,
    pub cover_image: Option<String>,
    pub project_link: Option<String>,
    pub back_link: &'static str,
    pub back_label: &'static str,
}

impl PostDetailView {
    pub fn from_page(page: &PostPage) -> Self {
        let post = &page.post;
        Self {
            title: post.title.clone(),
            category: post.category_str().unwrap_or_default().to_string(),
            date: display_date(post.created_at),
            excerpt: post.excerpt_or_empty().to_string(),
            body_html: page.body_html.clone(),
            cover_image: page.metadata.image.clone(),
            project_link: post
                .project_link
                .clone()
                .filter(|link| !link.trim().is_empty()),
            back_link: page.back_link,
            back_label: if is_project(post) {
                "Back to projects"
            } else {
                "Back to home"
            },
        }
    }

    pub fn meta(page: &PostPage) -> PageMetaView {
        PageMetaView {
            title: page.metadata.title.clone(),
            description: page.metadata.description.clone(),
            og_type: Some(page.metadata.og_type),
            published_time: Some(page.metadata.published_time.clone()),
            image: page.metadata.image.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AboutView {
    pub author: String,
    pub paragraphs: Vec<String>,
}

impl From<&SiteProfile> for AboutView {
    fn from(profile: &SiteProfile) -> Self {
        Self {
            author: profile.author.clone(),
            paragraphs: profile
                .about
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct ErrorPageView {
    pub status: u16,
    pub title: &'static str,
    pub message: &'static str,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            title: "Page not found",
            message: "The page you were looking for does not exist.",
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<HomeView>,
}

#[derive(Template)]
#[template(path = "projects.html")]
pub struct ProjectsTemplate {
    pub view: LayoutContext<ProjectsView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<AboutView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::fixtures::{EPOCH, post};

    #[test]
    fn display_date_is_long_form() {
        assert_eq!(display_date(EPOCH), "January 1, 2024");
    }

    #[test]
    fn about_splits_paragraphs_on_blank_lines() {
        let profile = SiteProfile {
            author: "A".into(),
            about: "First.\n\nSecond.\n\n\n".into(),
        };
        let view = AboutView::from(&profile);
        assert_eq!(view.paragraphs, ["First.", "Second."]);
    }

    #[test]
    fn projects_view_links_wrap() {
        let carousel = ProjectsCarousel::new(vec![post("a", 0), post("b", 1)], Some(1));
        let view = ProjectsView::from(&carousel);
        assert_eq!(view.position, "2 / 2");
        assert_eq!(view.next_href, "/projects?index=0");
        assert_eq!(view.previous_href, "/projects?index=0");
        assert!(view.has_many);
    }

    #[test]
    fn chrome_marks_active_link() {
        let profile = SiteProfile {
            author: "A".into(),
            about: String::new(),
        };
        let chrome = SiteChrome::new(&profile, "/projects");
        let active: Vec<_> = chrome
            .navigation
            .iter()
            .filter(|link| link.is_active)
            .map(|link| link.href)
            .collect();
        assert_eq!(active, ["/projects"]);
    }
}
