//! Import options
//!
//! These knobs shape how Markdown is read into the document model. They are
//! plain data so the config crate can build them from layered TOML.

use comrak::Options as ComrakOptions;
use serde::{Deserialize, Serialize};

/// Default limit on tree nesting for import and the output walks.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How a soft line break inside a paragraph is imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftBreak {
    /// A single space, so re-wrapped source compares equal.
    #[default]
    Space,
    /// A newline character, preserving the source line structure.
    Newline,
}

impl SoftBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftBreak::Space => " ",
            SoftBreak::Newline => "\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub soft_break: SoftBreak,
    /// Deepest tree accepted by import, the output walks and JSON
    /// decoding.
    pub max_depth: usize,
    /// Enable the GitHub strikethrough and autolink extensions.
    pub gfm: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            soft_break: SoftBreak::Space,
            max_depth: DEFAULT_MAX_DEPTH,
            gfm: true,
        }
    }
}

impl Options {
    pub(crate) fn comrak_options(&self) -> ComrakOptions<'static> {
        let mut options = ComrakOptions::default();
        if self.gfm {
            options.extension.strikethrough = true;
            options.extension.autolink = true;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_break_uses_lowercase_names() {
        let parsed: SoftBreak = serde_json::from_str("\"newline\"").unwrap();
        assert_eq!(parsed, SoftBreak::Newline);
        assert_eq!(SoftBreak::default().as_str(), " ");
    }

    #[test]
    fn gfm_switches_extensions() {
        let on = Options::default().comrak_options();
        assert!(on.extension.strikethrough);
        assert!(on.extension.autolink);

        let off = Options {
            gfm: false,
            ..Options::default()
        }
        .comrak_options();
        assert!(!off.extension.strikethrough);
        assert!(!off.extension.table);
    }
}
