//! Launch page metadata.

use crate::{CardKind, FrameLinks, FRAME_VERSION};

/// Page title shown by feed clients and link previews.
pub const APP_TITLE: &str = "Todo-Cast";

/// Page description shown by link previews.
pub const APP_DESCRIPTION: &str = "Simple todo management in Farcaster";

/// Returns the `fc:frame` and Open Graph meta tags of the launch frame, in order.
pub fn launch_meta_tags(links: &FrameLinks) -> Vec<(String, String)> {
    let image = links.og_image_url();
    let mut tags = vec![
        ("og:title".to_string(), APP_TITLE.to_string()),
        ("og:description".to_string(), APP_DESCRIPTION.to_string()),
        ("og:image".to_string(), image.clone()),
        ("fc:frame".to_string(), FRAME_VERSION.to_string()),
        ("fc:frame:image".to_string(), image),
        ("fc:frame:post_url".to_string(), links.post_url()),
    ];

    for (position, action) in CardKind::Launch.actions().iter().enumerate() {
        tags.push((
            format!("fc:frame:button:{}", position + 1),
            action.label().to_string(),
        ));
    }

    if let Some(prompt) = CardKind::Launch.input_prompt() {
        tags.push(("fc:frame:input:text".to_string(), prompt.to_string()));
    }

    tags
}

/// Renders the launch page.
pub fn render_launch_page(links: &FrameLinks) -> String {
    let mut head = String::new();
    for (name, content) in launch_meta_tags(links) {
        head.push_str(&format!(
            "    <meta property=\"{}\" content=\"{}\" />\n",
            escape_attr(&name),
            escape_attr(&content)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\" />\n    <title>{title}</title>\n{head}  </head>\n  <body>\n    <h1>{title}</h1>\n    <p>{description}</p>\n  </body>\n</html>\n",
        title = APP_TITLE,
        description = APP_DESCRIPTION,
        head = head,
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
