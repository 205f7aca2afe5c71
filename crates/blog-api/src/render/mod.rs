//! Page rendering
//!
//! Templates are compiled into the binary and registered with a single
//! [`Tera`] instance at startup.

use blog_common::AppError;
use serde::Serialize;
use tera::{Context, Tera};

/// Template sources, registered together so inheritance resolves in one pass
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("_form_errors.html", include_str!("../../templates/_form_errors.html")),
    ("_post_list.html", include_str!("../../templates/_post_list.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("search.html", include_str!("../../templates/search.html")),
    ("post_detail.html", include_str!("../../templates/post_detail.html")),
    ("post_form.html", include_str!("../../templates/post_form.html")),
    (
        "post_confirm_delete.html",
        include_str!("../../templates/post_confirm_delete.html"),
    ),
    ("author.html", include_str!("../../templates/author.html")),
    ("profile_edit.html", include_str!("../../templates/profile_edit.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("signup.html", include_str!("../../templates/signup.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

/// Client-side script served at `/static/blog.js`
pub const BLOG_JS: &str = include_str!("../../assets/blog.js");

/// Renders a named page from a serializable context
pub trait PageRenderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, AppError>;
}

/// Tera-backed renderer
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Compile the built-in templates
    pub fn new() -> Result<Self, AppError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .map_err(|e| AppError::Render(describe(&e)))?;
        Ok(Self { tera })
    }

    /// Render with any serializable context
    pub fn render_serialize<T: Serialize>(&self, template: &str, context: &T) -> Result<String, AppError> {
        let context = Context::from_serialize(context).map_err(|e| AppError::Render(describe(&e)))?;
        self.tera
            .render(template, &context)
            .map_err(|e| AppError::Render(format!("{template}: {}", describe(&e))))
    }
}

impl PageRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, AppError> {
        self.render_serialize(template, context)
    }
}

impl std::fmt::Debug for TeraRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraRenderer")
            .field("templates", &TEMPLATES.len())
            .finish()
    }
}

/// Tera keeps the useful part of an error in its source chain
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
