//! Markdown to HTML for posts, with heading anchors and a table of contents.
//!
//! Every heading gets an id derived from its text ([`heading_slug`]); repeats
//! get `-1`, `-2`, ... appended. An explicit `{#id}` attribute wins. Links
//! leaving the page open in a new tab.

use std::collections::{HashMap, HashSet};

use dioxus::prelude::*;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

#[derive(Clone, Debug, PartialEq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

fn parser_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    opts
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Anchor text for a heading: lower-cased, whitespace to `-`, punctuation dropped.
pub fn heading_slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

/// Hands out unique heading ids within one document.
#[derive(Default)]
struct HeadingIds {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    fn claim(&mut self, base: String) -> String {
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };
        let count = self.counts.entry(base.clone()).or_insert(0);
        let mut candidate = if *count == 0 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        while self.used.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        *count += 1;
        self.used.insert(candidate.clone());
        candidate
    }
}

fn is_external(url: &str) -> bool {
    !url.starts_with('#')
}

struct HeadingText {
    level: u8,
    text: String,
    explicit_id: Option<String>,
}

fn collect_headings(events: &[Event<'_>]) -> Vec<HeadingText> {
    let mut headings = Vec::new();
    let mut current: Option<HeadingText> = None;
    for event in events {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some(HeadingText {
                    level: *level as u8,
                    text: String::new(),
                    explicit_id: id.as_ref().map(|id| id.to_string()),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            _ => {}
        }
    }
    headings
}

pub fn render_markdown(source: &str) -> RenderedMarkdown {
    let events: Vec<Event<'_>> = Parser::new_ext(source, parser_options()).collect();

    let mut ids = HeadingIds::default();
    let toc: Vec<TocEntry> = collect_headings(&events)
        .into_iter()
        .map(|heading| {
            let base = heading
                .explicit_id
                .unwrap_or_else(|| heading_slug(&heading.text));
            TocEntry {
                level: heading.level,
                id: ids.claim(base),
                text: heading.text,
            }
        })
        .collect();

    let mut anchors = toc.iter().map(|entry| CowStr::from(entry.id.clone()));
    let events = events.into_iter().map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            classes,
            attrs,
            ..
        }) => Event::Start(Tag::Heading {
            level,
            id: anchors.next(),
            classes,
            attrs,
        }),
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) if is_external(&dest_url) => {
            let title = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", html_escape(&title))
            };
            Event::InlineHtml(CowStr::from(format!(
                "<a href=\"{}\"{title} target=\"_blank\" rel=\"noopener noreferrer\">",
                html_escape(&dest_url)
            )))
        }
        other => other,
    });

    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    RenderedMarkdown { html, toc }
}

/// Rendered markdown with an optional table of contents.
#[component]
pub fn MarkdownView(source: String, #[props(default)] show_toc: bool) -> Element {
    let RenderedMarkdown { html, toc } = render_markdown(&source);

    rsx! {
        div {
            class: "markdown-layout",
            if show_toc && !toc.is_empty() {
                nav {
                    class: "toc",
                    h2 { class: "toc-title", "Contents" }
                    ul {
                        for entry in toc {
                            li {
                                key: "{entry.id}",
                                class: "toc-level-{entry.level}",
                                a { href: "#{entry.id}", "{entry.text}" }
                            }
                        }
                    }
                }
            }
            article {
                class: "markdown-body",
                dangerous_inner_html: "{html}",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_slug() {
        assert_eq!(heading_slug("Hello, World!"), "hello-world");
        assert_eq!(heading_slug("Step 1: Recon"), "step-1-recon");
        assert_eq!(heading_slug("  user_flag  "), "user_flag");
    }

    #[test]
    fn test_headings_get_ids_and_toc() {
        let rendered = render_markdown("# Lame\n\n## Recon\n\ntext\n\n## Foothold `smb`\n");
        assert!(rendered.html.contains("<h1 id=\"lame\">Lame</h1>"));
        assert!(rendered.html.contains("<h2 id=\"recon\">Recon</h2>"));
        assert_eq!(
            rendered.toc,
            vec![
                TocEntry { level: 1, text: "Lame".to_string(), id: "lame".to_string() },
                TocEntry { level: 2, text: "Recon".to_string(), id: "recon".to_string() },
                TocEntry { level: 2, text: "Foothold smb".to_string(), id: "foothold-smb".to_string() },
            ]
        );
    }

    #[test]
    fn test_duplicate_headings_are_suffixed() {
        let rendered = render_markdown("## Notes\n\n## Notes\n\n## Notes\n\n## Notes-1\n");
        let ids: Vec<_> = rendered.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-1", "notes-2", "notes-1-1"]);
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let rendered = render_markdown("## Privilege escalation {#privesc}\n");
        assert_eq!(rendered.toc[0].id, "privesc");
        assert!(rendered.html.contains("id=\"privesc\""));
    }

    #[test]
    fn test_links_open_in_new_tab() {
        let rendered = render_markdown("[site](https://example.com \"Example\") and [up](#recon)");
        assert!(rendered.html.contains(
            "<a href=\"https://example.com\" title=\"Example\" target=\"_blank\" rel=\"noopener noreferrer\">site</a>"
        ));
        assert!(rendered.html.contains("<a href=\"#recon\">up</a>"));
    }

    #[test]
    fn test_extensions_enabled() {
        let rendered = render_markdown(
            "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n\nnote[^1]\n\n[^1]: footnote\n",
        );
        assert!(rendered.html.contains("<table>"));
        assert!(rendered.html.contains("<del>old</del>"));
        assert!(rendered.html.contains("type=\"checkbox\""));
        assert!(rendered.html.contains("footnote-definition"));
    }

    #[test]
    fn test_fenced_code_keeps_language_class() {
        let rendered = render_markdown("```python\nfrom pwn import *\n```\n");
        assert!(rendered
            .html
            .contains("<pre><code class=\"language-python\">from pwn import *"));
    }
}
