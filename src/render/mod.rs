//! Template rendering module
//!
//! Page templates are compiled in with maud and registered by name once at
//! startup. The set is read-only afterwards; changing a template means
//! rebuilding and restarting.

use maud::{html, Markup, DOCTYPE};
use std::collections::HashMap;
use std::fmt;

use crate::routing::Action;
use crate::storage::Page;

type TemplateFn = fn(&Page) -> Markup;

#[derive(Debug, PartialEq, Eq)]
pub struct RenderError {
    name: String,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template \"{}\" is undefined", self.name)
    }
}

impl std::error::Error for RenderError {}

/// Named page templates
pub struct Templates {
    templates: HashMap<&'static str, TemplateFn>,
}

impl Templates {
    pub fn new() -> Self {
        let mut templates: HashMap<&'static str, TemplateFn> = HashMap::new();
        templates.insert("view", view_template);
        templates.insert("edit", edit_template);
        Self { templates }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.templates.keys().copied()
    }

    pub fn render(&self, name: &str, page: &Page) -> Result<String, RenderError> {
        let template = self.templates.get(name).ok_or_else(|| RenderError {
            name: name.to_string(),
        })?;
        Ok(template(page).into_string())
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

fn layout(heading: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (heading) }
            }
            body { (content) }
        }
    }
}

fn view_template(page: &Page) -> Markup {
    let title = page.title.as_str();
    let body = page.body_text().into_owned();
    layout(
        title,
        &html! {
            h1 { (title) }
            p { "[" a href=(Action::Edit.path(&page.title)) { "edit" } "]" }
            div { (body) }
        },
    )
}

fn edit_template(page: &Page) -> Markup {
    let title = page.title.as_str();
    let body = page.body_text().into_owned();
    layout(
        &format!("Editing {title}"),
        &html! {
            h1 { "Editing " (title) }
            form action=(Action::Save.path(&page.title)) method="POST" {
                div { textarea name="body" rows="20" cols="80" { (body) } }
                div { input type="submit" value="Save"; }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Title;

    fn page(title: &str, body: &str) -> Page {
        Page::new(Title::parse(title).unwrap(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_view_contains_title_body_and_edit_link() {
        let html = Templates::new()
            .render("view", &page("Rust", "Ferris says hi"))
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Rust</h1>"));
        assert!(html.contains("Ferris says hi"));
        assert!(html.contains("href=\"/edit/Rust\""));
    }

    #[test]
    fn test_edit_form_posts_to_save() {
        let html = Templates::new().render("edit", &page("Rust", "draft")).unwrap();
        assert!(html.contains("Editing Rust"));
        assert!(html.contains("action=\"/save/Rust\""));
        assert!(html.contains("method=\"POST\""));
        assert!(html.contains("name=\"body\""));
        assert!(html.contains(">draft</textarea>"));
    }

    #[test]
    fn test_body_is_escaped() {
        let html = Templates::new()
            .render("view", &page("Xss", "<script>alert(1)</script>"))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unknown_template() {
        let err = Templates::new()
            .render("history", &page("Rust", ""))
            .unwrap_err();
        assert_eq!(err.to_string(), "template \"history\" is undefined");
    }

    #[test]
    fn test_names() {
        let mut names: Vec<_> = Templates::new().names().collect();
        names.sort_unstable();
        assert_eq!(names, ["edit", "view"]);
    }
}
