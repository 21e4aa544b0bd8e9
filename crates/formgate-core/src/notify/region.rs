use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::utils::escape_html;

/// How a response body is embedded into a display region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPolicy {
    /// Embed the body as-is. The server is trusted to return safe markup.
    #[default]
    Trusted,
    /// HTML-escape the body before embedding it.
    Escaped,
}

impl RenderPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trusted" => Some(RenderPolicy::Trusted),
            "escaped" => Some(RenderPolicy::Escaped),
            _ => None,
        }
    }
}

/// Rendered markup for a display region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap a response body in a top-level heading.
    pub fn heading(body: &str, policy: RenderPolicy) -> Self {
        match policy {
            RenderPolicy::Trusted => {
                debug!(len = body.len(), "Embedding untrusted response body without escaping");
                Markup(format!("<h1>{}</h1>", body))
            }
            RenderPolicy::Escaped => Markup(format!("<h1>{}</h1>", escape_html(body))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A display region addressed by id that holds one piece of markup.
#[derive(Clone)]
pub struct MarkupRegion {
    id: String,
    content: Arc<watch::Sender<Option<Markup>>>,
}

impl MarkupRegion {
    pub fn new(id: impl Into<String>) -> Self {
        let (content, _) = watch::channel(None);
        Self {
            id: id.into(),
            content: Arc::new(content),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the region's content.
    pub fn set(&self, markup: Markup) {
        self.content.send_replace(Some(markup));
    }

    pub fn clear(&self) {
        self.content.send_replace(None);
    }

    pub fn content(&self) -> Option<Markup> {
        self.content.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Markup>> {
        self.content.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_heading_is_verbatim() {
        let markup = Markup::heading("<li>alice</li>", RenderPolicy::Trusted);
        assert_eq!(markup.as_str(), "<h1><li>alice</li></h1>");
    }

    #[test]
    fn test_escaped_heading() {
        let markup = Markup::heading("<li>alice</li>", RenderPolicy::Escaped);
        assert_eq!(markup.as_str(), "<h1>&lt;li&gt;alice&lt;/li&gt;</h1>");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(RenderPolicy::parse("Escaped"), Some(RenderPolicy::Escaped));
        assert_eq!(RenderPolicy::parse("trusted"), Some(RenderPolicy::Trusted));
        assert_eq!(RenderPolicy::parse("raw"), None);
    }

    #[test]
    fn test_region_replaces_content() {
        let region = MarkupRegion::new("userList");
        assert_eq!(region.id(), "userList");
        assert!(region.content().is_none());

        region.set(Markup::heading("[]", RenderPolicy::Trusted));
        region.set(Markup::heading("[\"bob\"]", RenderPolicy::Trusted));
        assert_eq!(region.content().unwrap().as_str(), "<h1>[\"bob\"]</h1>");

        region.clear();
        assert!(region.content().is_none());
    }
}
