use maud::{Markup, html};

use crate::HTMX_PATH;

pub const DEFAULT_INDEX_TITLE: &str = "Darts Dashboard";

#[must_use]
pub fn render_head(title: &str) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            link rel="stylesheet" type="text/css" href="/static/styles.css";
            title { (title) }
            script src=(HTMX_PATH) defer crossorigin="anonymous" {}
        }
    }
}

/// Landing page. The button creates a fresh match and redirects to its entry form.
#[must_use]
pub fn render_index_template(title: &str, error: Option<&str>) -> Markup {
    html! {
        (maud::DOCTYPE)
        (render_head(title))
        body {
            div class="dashboard" {
                h1 { (title) }
                @if let Some(error) = error {
                    div class="banner banner-error" { "Failed to create match: " (error) }
                }
                form method="post" action="matches" {
                    button type="submit" class="create-match" { "Create New Match" }
                }
            }
        }
    }
}
