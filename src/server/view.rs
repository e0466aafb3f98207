//! Root view rendering for first page loads.
//!
//! The default [`TemplateRootView`] reads an HTML file and replaces these
//! placeholders in a single pass, so substituted text is never rescanned:
//!
//! | Placeholder | Replaced with |
//! |-------------|---------------|
//! | `@inertiaHead` | SSR head tags, or nothing |
//! | `@inertia` | SSR body, or `<div id="app" data-page="…">` |
//! | `@viewData.<key>` | HTML-escaped view data entry, or nothing when absent |

use crate::error::{InertiaError, Result};
use crate::types::Page;
use serde_json::{Map, Value};
use std::path::PathBuf;

const HEAD_PLACEHOLDER: &str = "@inertiaHead";
const BODY_PLACEHOLDER: &str = "@inertia";
const VIEW_DATA_PREFIX: &str = "@viewData.";

/// Everything a root view needs to render one page.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Resolved page
    pub page: &'a Page,

    /// Page serialized as JSON
    pub page_json: &'a str,

    /// Extra view data set with `with_view_data`
    pub view_data: &'a Map<String, Value>,

    /// SSR head tags, when SSR succeeded
    pub ssr_head: Option<&'a str>,

    /// SSR body markup, when SSR succeeded
    pub ssr_body: Option<&'a str>,
}

impl ViewContext<'_> {
    /// Markup for the `@inertiaHead` placeholder.
    #[must_use]
    pub fn head(&self) -> String {
        self.ssr_head.unwrap_or_default().to_string()
    }

    /// Markup for the `@inertia` placeholder.
    #[must_use]
    pub fn body(&self) -> String {
        match self.ssr_body {
            Some(body) => body.to_string(),
            None => html_fragment(self.page_json),
        }
    }
}

/// Renders the HTML document of a first page load.
pub trait RootView: Send + Sync {
    /// Render the full document.
    fn render(&self, ctx: &ViewContext<'_>) -> Result<String>;
}

/// Mount point carrying the page as an HTML-escaped attribute.
///
/// ```
/// use inertia_axum::server::html_fragment;
///
/// assert_eq!(
///     html_fragment(r#"{"a":"<b>"}"#),
///     r#"<div id="app" data-page="{&quot;a&quot;:&quot;&lt;b&gt;&quot;}"></div>"#
/// );
/// ```
pub fn html_fragment(page_json: &str) -> String {
    format!(
        "<div id=\"app\" data-page=\"{}\"></div>",
        html_escape::encode_double_quoted_attribute(page_json)
    )
}

/// [`RootView`] backed by an HTML template file.
///
/// The file is read on every render so template edits show up without a
/// restart.
#[derive(Debug, Clone)]
pub struct TemplateRootView {
    source: TemplateSource,
}

#[derive(Debug, Clone)]
enum TemplateSource {
    File(PathBuf),
    Inline(String),
}

impl TemplateRootView {
    /// Template read from `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: TemplateSource::File(path.into()),
        }
    }

    /// Template held in memory.
    ///
    /// ```
    /// use inertia_axum::server::{RootView, TemplateRootView, ViewContext};
    /// use inertia_axum::Page;
    ///
    /// let view = TemplateRootView::inline("<head>@inertiaHead</head><body>@inertia</body>");
    /// let page = Page::new("Home", "/");
    /// let html = view.render(&ViewContext {
    ///     page: &page,
    ///     page_json: "{}",
    ///     view_data: &Default::default(),
    ///     ssr_head: None,
    ///     ssr_body: Some("<div>ssr</div>"),
    /// }).unwrap();
    /// assert_eq!(html, "<head></head><body><div>ssr</div></body>");
    /// ```
    pub fn inline(template: impl Into<String>) -> Self {
        Self {
            source: TemplateSource::Inline(template.into()),
        }
    }

    fn template(&self) -> Result<String> {
        match &self.source {
            TemplateSource::Inline(template) => Ok(template.clone()),
            TemplateSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                InertiaError::View(format!("cannot read root view {}: {}", path.display(), e))
            }),
        }
    }
}

impl RootView for TemplateRootView {
    fn render(&self, ctx: &ViewContext<'_>) -> Result<String> {
        Ok(fill_placeholders(&self.template()?, ctx))
    }
}

fn fill_placeholders(template: &str, ctx: &ViewContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..at]);
        let tail = &rest[at..];

        // `@inertia` is a prefix of `@inertiaHead`
        rest = if let Some(after) = tail.strip_prefix(HEAD_PLACEHOLDER) {
            out.push_str(&ctx.head());
            after
        } else if let Some(after) = tail.strip_prefix(BODY_PLACEHOLDER) {
            out.push_str(&ctx.body());
            after
        } else if let Some(after) = tail.strip_prefix(VIEW_DATA_PREFIX) {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len == 0 {
                out.push_str(VIEW_DATA_PREFIX);
                after
            } else {
                let (key, after) = after.split_at(len);
                out.push_str(&view_value(ctx.view_data.get(key)));
                after
            }
        } else {
            out.push('@');
            &tail[1..]
        };
    }

    out.push_str(rest);
    out
}

fn view_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => html_escape::encode_safe(s).into_owned(),
        Some(other) => html_escape::encode_safe(&other.to_string()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(view: &TemplateRootView, page_json: &str, ssr: Option<(&str, &str)>) -> Result<String> {
        let page = Page::new("Test/Page", "/");
        let view_data = Map::new();
        view.render(&ViewContext {
            page: &page,
            page_json,
            view_data: &view_data,
            ssr_head: ssr.map(|(head, _)| head),
            ssr_body: ssr.map(|(_, body)| body),
        })
    }

    #[test]
    fn test_client_side_mount_point() {
        let view = TemplateRootView::inline("<head>@inertiaHead</head><body>@inertia</body>");
        let html = render(&view, r#"{"component":"Test/Page"}"#, None).unwrap();
        assert_eq!(
            html,
            "<head></head><body><div id=\"app\" data-page=\"{&quot;component&quot;:&quot;Test/Page&quot;}\"></div></body>"
        );
    }

    #[test]
    fn test_ssr_fragments() {
        let view = TemplateRootView::inline("@inertiaHead|@inertia");
        let html = render(&view, "{}", Some(("<title>T</title>", "<main/>"))).unwrap();
        assert_eq!(html, "<title>T</title>|<main/>");
    }

    #[test]
    fn test_view_data_placeholders() {
        let view = TemplateRootView::inline(
            "<title>@viewData.title</title><meta content=\"@viewData.count\">@viewData.missing@viewData.",
        );
        let page = Page::new("Test/Page", "/");
        let mut view_data = Map::new();
        view_data.insert("title".into(), Value::from("Users & <Admins>"));
        view_data.insert("count".into(), Value::from(3));

        let html = view
            .render(&ViewContext {
                page: &page,
                page_json: "{}",
                view_data: &view_data,
                ssr_head: None,
                ssr_body: None,
            })
            .unwrap();
        assert_eq!(
            html,
            "<title>Users &amp; &lt;Admins&gt;</title><meta content=\"3\">@viewData."
        );
    }

    #[test]
    fn test_ssr_head_is_not_rescanned() {
        let view = TemplateRootView::inline("<head>@inertiaHead</head><body>@inertia</body>");
        let html = render(
            &view,
            "{}",
            Some(("<title>@inertia @viewData.title</title>", "<main/>")),
        )
        .unwrap();
        assert_eq!(
            html,
            "<head><title>@inertia @viewData.title</title></head><body><main/></body>"
        );
    }

    #[test]
    fn test_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.html");
        std::fs::write(&path, "<body>@inertia</body>").unwrap();

        let html = render(&TemplateRootView::from_file(&path), "{}", None).unwrap();
        assert!(html.starts_with("<body><div id=\"app\""));
    }

    #[test]
    fn test_missing_template_is_view_error() {
        let view = TemplateRootView::from_file("/nonexistent/app.html");
        assert!(matches!(render(&view, "{}", None), Err(InertiaError::View(_))));
    }
}
