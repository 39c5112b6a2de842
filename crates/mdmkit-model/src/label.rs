//! Localized display text

use serde::{Deserialize, Serialize};

/// One localized text entry, keyed by context and language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Context the text applies in.
    pub context: String,

    /// Language tag (e.g. "en-US").
    pub language: String,

    /// The display text itself.
    pub text: String,
}

impl Text {
    /// Create a text entry.
    pub fn new(
        context: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            language: language.into(),
            text: text.into(),
        }
    }
}

/// The label set of one owning element.
///
/// Entries are order-significant and a language may repeat across contexts
/// with different text; no uniqueness is enforced here. Last-wins resolution
/// is a consumer choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    /// Default context of the label set.
    pub context: String,

    /// Text entries in markup order.
    pub texts: Vec<Text>,
}

impl Labels {
    /// Create an empty label set for `context`.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            texts: Vec::new(),
        }
    }

    /// Append a text entry.
    pub fn push_text(&mut self, text: Text) {
        self.texts.push(text);
    }

    /// Find the first text for a language, in entry order.
    pub fn text_for(&self, language: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.language == language)
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_order() {
        let mut labels = Labels::new("Question");
        labels.push_text(Text::new("Question", "en-US", "Age?"));
        labels.push_text(Text::new("Analysis", "en-US", "Age"));

        assert_eq!(labels.texts.len(), 2);
        assert_eq!(labels.text_for("en-US"), Some("Age?"));
    }

    #[test]
    fn duplicate_languages_allowed() {
        let mut labels = Labels::new("Question");
        labels.push_text(Text::new("Question", "de-DE", "Alter?"));
        labels.push_text(Text::new("Question", "de-DE", "Wie alt?"));

        assert_eq!(labels.texts.len(), 2);
    }
}
