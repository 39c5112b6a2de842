//! Properties and the versioned/unversioned split

use serde::{Deserialize, Serialize};

use crate::collection::VersionedCollection;

/// A named, typed, context-scoped attribute value.
///
/// `value`, `property_type` and `context` are format-defined strings, opaque
/// to this layer. A property may carry its own styles, which are themselves
/// properties; the styles collection is exclusively owned by this property,
/// so it is dropped here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name. Never empty on a property attached to a document.
    pub name: String,

    /// Property value.
    pub value: String,

    /// Format-defined type tag.
    pub property_type: String,

    /// Context the property applies in.
    pub context: String,

    /// Optional data-source qualifier.
    pub data_source: Option<String>,

    /// Owned style properties, recursive.
    pub styles: Option<VersionedCollection<Property>>,
}

impl Property {
    /// Create a property with no data source and no styles.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            property_type: property_type.into(),
            context: context.into(),
            data_source: None,
            styles: None,
        }
    }

    /// Set the data-source qualifier.
    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    /// Set the owned styles collection.
    pub fn with_styles(mut self, styles: VersionedCollection<Property>) -> Self {
        self.styles = Some(styles);
        self
    }
}

/// Style definitions are plain properties under version control.
pub type Styles = VersionedCollection<Property>;

/// Template settings share the property representation.
pub type Templates = Properties;

/// Notes share the property representation.
pub type Notes = Properties;

/// Label styles share the property representation.
pub type LabelStyles = Properties;

/// A schema element's property set, split into unversioned and versioned
/// collections.
///
/// Unversioned properties apply identically to every schema version and must
/// survive a version rollback untouched; versioned ones are replaced. The
/// split is first-class here rather than a flag on each property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Properties that apply across all versions.
    pub unversioned: VersionedCollection<Property>,

    /// Properties belonging to the current version.
    pub values: VersionedCollection<Property>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a versioned property.
    pub fn push(&mut self, property: Property) {
        self.values.push(property);
    }

    /// Append an unversioned property.
    pub fn push_unversioned(&mut self, property: Property) {
        self.unversioned.push(property);
    }

    /// Indexed read over the versioned set only.
    pub fn get(&self, index: usize) -> Option<&Property> {
        self.values.get(index)
    }

    /// Look up a versioned property by name.
    pub fn find(&self, name: &str) -> Option<&Property> {
        self.values.iter().find(|p| p.name == name)
    }

    /// Look up an unversioned property by name. Unversioned properties are
    /// addressed by name, not index.
    pub fn find_unversioned(&self, name: &str) -> Option<&Property> {
        self.unversioned.iter().find(|p| p.name == name)
    }

    /// Remove every versioned property, leaving the unversioned set
    /// untouched. This is the mechanism behind a version rollback.
    pub fn clear_versioned(&mut self) {
        self.values = VersionedCollection::new();
    }

    /// `true` when both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.unversioned.is_empty() && self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_routes_to_versioned() {
        let mut props = Properties::new();
        props.push(Property::new("Label", "v2", "text", "Question"));

        assert_eq!(props.get(0).map(|p| p.name.as_str()), Some("Label"));
        assert!(props.find_unversioned("Label").is_none());
    }

    #[test]
    fn unversioned_lookup_by_name() {
        let mut props = Properties::new();
        props.push_unversioned(Property::new("Lang", "en", "text", "Analysis"));

        assert!(props.get(0).is_none());
        assert_eq!(
            props.find_unversioned("Lang").map(|p| p.value.as_str()),
            Some("en")
        );
    }

    #[test]
    fn rollback_keeps_unversioned() {
        let mut props = Properties::new();
        props.push_unversioned(Property::new("Lang", "en", "text", "Analysis"));
        props.push(Property::new("Label", "v2", "text", "Question"));

        props.clear_versioned();

        assert!(props.find("Label").is_none());
        assert_eq!(
            props.find_unversioned("Lang").map(|p| p.value.as_str()),
            Some("en")
        );
    }

    #[test]
    fn indexed_read_past_end_is_absent() {
        let mut props = Properties::new();
        props.push(Property::new("a", "1", "t", "c"));

        assert!(props.get(1).is_none());
    }

    #[test]
    fn styles_are_owned_properties() {
        let mut styles = Styles::new();
        styles.push(Property::new("Color", "blue", "style", "Question"));

        let prop = Property::new("Cell", "", "style", "Question").with_styles(styles);
        assert_eq!(prop.styles.as_ref().map(|s| s.len()), Some(1));
    }
}
