use std::collections::HashSet;
use std::fmt;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Script,
    Style,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Script => "script",
            Self::Style => "stylesheet",
        })
    }
}

/// The part of the document the loader mutates.
pub trait DocumentHead {
    fn append_script(&mut self, url: &str) -> Result<(), String>;
    fn append_stylesheet(&mut self, url: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    Injected,
    /// Already in the head; nothing was appended.
    AlreadyInjected,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("invalid {kind} URL: {url:?}")]
    InvalidUrl { kind: ResourceKind, url: String },
    #[error("failed to append {kind} {url}: {reason}")]
    Append {
        kind: ResourceKind,
        url: String,
        reason: String,
    },
}

/// Tracks which dependency URLs are already in the document head, so each is
/// injected at most once per page.
#[derive(Debug, Default)]
pub struct ResourceLoader {
    scripts: HashSet<String>,
    styles: HashSet<String>,
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(
        &mut self,
        head: &mut impl DocumentHead,
        url: &str,
        kind: ResourceKind,
    ) -> Result<InjectOutcome, LoadError> {
        if Url::parse(url).is_err() {
            return Err(LoadError::InvalidUrl {
                kind,
                url: url.to_string(),
            });
        }

        let seen = match kind {
            ResourceKind::Script => &mut self.scripts,
            ResourceKind::Style => &mut self.styles,
        };
        if seen.contains(url) {
            return Ok(InjectOutcome::AlreadyInjected);
        }

        let appended = match kind {
            ResourceKind::Script => head.append_script(url),
            ResourceKind::Style => head.append_stylesheet(url),
        };
        appended.map_err(|reason| LoadError::Append {
            kind,
            url: url.to_string(),
            reason,
        })?;

        seen.insert(url.to_string());
        Ok(InjectOutcome::Injected)
    }
}
