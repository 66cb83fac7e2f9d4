pub mod couple;
pub mod rsvp;

use crate::rsvp::{Toast, ToastKind};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Title/subtitle banner at the top of every page.
pub fn header(main_title: &str, subtitle: &str) -> String {
    format!(
        r#"<header class="page-header">
  <p class="page-header__subtitle">{subtitle}</p>
  <h1 class="page-header__title">{main_title}</h1>
</header>"#,
        main_title = escape(main_title),
        subtitle = escape(subtitle),
    )
}

fn toast_stack(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }
    let items: String = toasts
        .iter()
        .map(|t| {
            let class = match t.kind {
                ToastKind::Success => "toast toast--success",
                ToastKind::Error => "toast toast--error",
            };
            format!(
                r#"<div class="{class}" role="status">{}</div>"#,
                escape(&t.message)
            )
        })
        .collect();
    format!(r#"<div class="toasts">{items}</div>"#)
}

/// Full document around a page body.
pub fn layout(title: &str, body: &str, toasts: &[Toast]) -> String {
    let toasts = toast_stack(toasts);
    let title = escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/assets/site.css">
</head>
<body class="font-serif">
  {toasts}
  <nav class="site-nav">
    <a href="/couple">The Couple</a>
    <a href="/rsvp">RSVP</a>
  </nav>
  <main>
{body}
  </main>
</body>
</html>"#
    )
}
