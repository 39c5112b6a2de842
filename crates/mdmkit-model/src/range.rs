//! Numeric/date bounds attached to variables

use serde::{Deserialize, Serialize};

/// Declared and effective bounds of a variable.
///
/// All fields are optional, format-defined strings. Effective bounds may be
/// tighter than the declared ones (e.g. narrowed by a filter) and are
/// independent of them; nothing here ties the two together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Declared minimum value.
    pub min_value: Option<String>,

    /// Value type of the declared minimum.
    pub min_type: Option<String>,

    /// Declared maximum value.
    pub max_value: Option<String>,

    /// Value type of the declared maximum.
    pub max_type: Option<String>,

    /// Effective minimum after narrowing.
    pub effective_min_value: Option<String>,

    /// Effective maximum after narrowing.
    pub effective_max_value: Option<String>,
}

impl Range {
    /// Create an unbounded range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared minimum and its type.
    pub fn with_min(mut self, value: impl Into<String>, min_type: impl Into<String>) -> Self {
        self.min_value = Some(value.into());
        self.min_type = Some(min_type.into());
        self
    }

    /// Set the declared maximum and its type.
    pub fn with_max(mut self, value: impl Into<String>, max_type: impl Into<String>) -> Self {
        self.max_value = Some(value.into());
        self.max_type = Some(max_type.into());
        self
    }

    /// Set the effective bounds.
    pub fn with_effective(
        mut self,
        min: Option<String>,
        max: Option<String>,
    ) -> Self {
        self.effective_min_value = min;
        self.effective_max_value = max;
        self
    }

    /// `true` when no bound is set at all.
    pub fn is_unbounded(&self) -> bool {
        self.min_value.is_none()
            && self.max_value.is_none()
            && self.effective_min_value.is_none()
            && self.effective_max_value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_by_default() {
        assert!(Range::new().is_unbounded());
    }

    #[test]
    fn bounds_carry_their_own_types() {
        let range = Range::new().with_min("1", "long").with_max("99", "long");

        assert_eq!(range.min_value.as_deref(), Some("1"));
        assert_eq!(range.min_type.as_deref(), Some("long"));
        assert_eq!(range.max_type.as_deref(), Some("long"));
        assert!(range.effective_min_value.is_none());
    }
}
