use crate::sanitize::{escape_attr, escape_text};

pub const MARKDOWN_STYLESHEET: &str =
    "https://cdn.jsdelivr.net/npm/github-markdown-css@5/github-markdown.min.css";

/// Wrap rendered (already sanitized) HTML into a standalone preview page.
pub fn build_preview_document(title: Option<&str>, body_html: &str, rendered_utc: &str) -> String {
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or("README preview");

    let mut escaped_title = String::with_capacity(title.len());
    escape_text(title, &mut escaped_title);
    let mut escaped_stamp = String::with_capacity(rendered_utc.len());
    escape_attr(rendered_utc, &mut escaped_stamp);

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"generated\" content=\"{escaped_stamp}\">\n\
         <title>{escaped_title}</title>\n\
         <link rel=\"stylesheet\" href=\"{MARKDOWN_STYLESHEET}\">\n\
         <style>.markdown-body {{ box-sizing: border-box; max-width: 980px; margin: 0 auto; padding: 45px; }}</style>\n\
         </head>\n\
         <body>\n\
         <article class=\"markdown-body\">\n\
         {body_html}\n\
         </article>\n\
         </body>\n\
         </html>\n"
    )
}

/// First level-one heading of a markdown document, used as page title.
/// Lines inside fenced code blocks are not headings.
pub fn markdown_title(markdown: &str) -> Option<&str> {
    let mut fence: Option<&str> = None;
    for line in markdown.lines().map(str::trim_start) {
        match fence {
            Some(marker) => {
                if line.starts_with(marker) {
                    fence = None;
                }
            }
            None if line.starts_with("```") => fence = Some("```"),
            None if line.starts_with("~~~") => fence = Some("~~~"),
            None => {
                if let Some(title) = line.strip_prefix("# ").map(str::trim) {
                    if !title.is_empty() {
                        return Some(title);
                    }
                }
            }
        }
    }
    None
}
