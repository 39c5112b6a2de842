//! Alias variables with native-language overrides

use serde::{Deserialize, Serialize};

use crate::property::Properties;
use crate::range::Range;

/// A native-language value override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeValue {
    /// Fully-qualified variable name the override applies to.
    pub full_name: String,

    /// Native value.
    pub value: String,
}

/// A sub-alias name mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAlias {
    /// Position key within the alias.
    pub index: String,

    /// Mapped name.
    pub name: String,
}

/// A named variable carrying range constraints, native-language values and
/// sub-alias mappings.
///
/// `native_values` and `sub_aliases` stay `None` until the first push, so a
/// variable with no overrides (the common case) allocates no containers.
/// "Never declared" and "declared but empty" stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasVariable {
    /// Fully-qualified variable name.
    pub full_name: String,

    /// Alias name.
    pub alias_name: String,

    /// Range constraints.
    pub range: Range,

    /// Native-language value overrides, lazily allocated.
    pub native_values: Option<Vec<NativeValue>>,

    /// Sub-alias mappings, lazily allocated.
    pub sub_aliases: Option<Vec<SubAlias>>,

    /// Own property set.
    pub properties: Option<Properties>,
}

impl AliasVariable {
    /// Create an alias variable with no overrides.
    pub fn new(full_name: impl Into<String>, alias_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            alias_name: alias_name.into(),
            range: Range::new(),
            native_values: None,
            sub_aliases: None,
            properties: None,
        }
    }

    /// Append a native-value override, allocating the backing sequence on
    /// first call. Duplicates are accepted; each call appends exactly one
    /// entry.
    pub fn push_native_value(&mut self, full_name: impl Into<String>, value: impl Into<String>) {
        self.native_values
            .get_or_insert_with(Vec::new)
            .push(NativeValue {
                full_name: full_name.into(),
                value: value.into(),
            });
    }

    /// Append a sub-alias mapping, allocating the backing sequence on first
    /// call. Duplicates are accepted.
    pub fn push_sub_alias(&mut self, index: impl Into<String>, name: impl Into<String>) {
        self.sub_aliases.get_or_insert_with(Vec::new).push(SubAlias {
            index: index.into(),
            name: name.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_absent_until_first_push() {
        let var = AliasVariable::new("Person.Age", "AGE");

        assert!(var.native_values.is_none());
        assert!(var.sub_aliases.is_none());
    }

    #[test]
    fn push_native_value_appends_one_entry_per_call() {
        let mut var = AliasVariable::new("Person.Age", "AGE");

        var.push_native_value("Person.Age", "42");
        assert_eq!(var.native_values.as_ref().map(Vec::len), Some(1));

        // Repeating the same arguments appends again - no deduplication.
        var.push_native_value("Person.Age", "42");
        assert_eq!(var.native_values.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn sub_alias_lazy_allocation() {
        let mut var = AliasVariable::new("Person.Age", "AGE");
        var.push_sub_alias("0", "AGE_0");

        assert_eq!(
            var.sub_aliases.as_ref().and_then(|s| s.first()).map(|s| s.name.as_str()),
            Some("AGE_0")
        );
    }
}
