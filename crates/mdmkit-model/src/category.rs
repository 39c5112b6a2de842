//! Response category hierarchy

use serde::{Deserialize, Serialize};

use crate::collection::VersionedCollection;
use crate::field::Reference;
use crate::label::Labels;
use crate::property::{LabelStyles, Notes, Properties, Styles, Templates};

/// A single response category.
///
/// Every non-identity field is optional and exclusively owned when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: String,

    /// Category name.
    pub name: String,

    /// Fixed-position flag, as written in the source.
    pub fixed: Option<String>,

    /// No-filter flag.
    pub no_filter: Option<String>,

    /// Missing-data marker.
    pub missing: Option<String>,

    /// Exclusive-answer flag.
    pub exclusive: Option<String>,

    /// Other-local flag.
    pub other_local: Option<String>,

    /// Factor value for analysis.
    pub factor_value: Option<String>,

    /// Factor value type.
    pub factor_type: Option<String>,

    /// Keyboard code for data entry.
    pub keycode: Option<String>,

    /// Filter expression.
    pub expression: Option<String>,

    /// Own property set.
    pub properties: Option<Properties>,

    /// Own template set.
    pub templates: Option<Templates>,

    /// Display labels.
    pub labels: Option<Labels>,

    /// Label style properties.
    pub label_styles: Option<LabelStyles>,

    /// Own style properties.
    pub styles: Option<Styles>,

    /// By-name reference to the "other, specify" variable, resolved by
    /// consumers.
    pub other_variable: Option<Reference>,

    /// By-name reference to the multiplier variable.
    pub multiplier_variable: Option<Reference>,

    /// Notes attached to the category.
    pub notes: Option<Notes>,
}

impl Category {
    /// Create a bare category.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fixed: None,
            no_filter: None,
            missing: None,
            exclusive: None,
            other_local: None,
            factor_value: None,
            factor_type: None,
            keycode: None,
            expression: None,
            properties: None,
            templates: None,
            labels: None,
            label_styles: None,
            styles: None,
            other_variable: None,
            multiplier_variable: None,
            notes: None,
        }
    }
}

/// A flat element inside a category set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryElement {
    /// Element id.
    pub id: String,

    /// Element name.
    pub name: String,

    /// Format-defined element type.
    pub element_type: String,

    /// Display labels.
    pub labels: Option<Labels>,
}

impl CategoryElement {
    /// Create an element.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            element_type: element_type.into(),
            labels: None,
        }
    }
}

/// A grouping of response categories.
///
/// Recursive: `sub_categories` is itself a full `Categories` node (at most
/// one per node), giving an arbitrarily deep tree. Nested categories go into
/// the versioned collection; flat elements coexist with sub-categories with
/// no precedence. `global_namespace` is a name key resolved by consumers,
/// never a pointer into another tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    /// Optional id.
    pub id: Option<String>,

    /// Optional name.
    pub name: Option<String>,

    /// Namespace key for qualified lookup.
    pub global_namespace: String,

    /// Display labels.
    pub labels: Option<Labels>,

    /// Member categories under version control.
    pub categories: VersionedCollection<Category>,

    /// At most one nested category tree.
    pub sub_categories: Option<Box<Categories>>,

    /// Flat elements, lazily allocated on first push.
    pub elements: Option<Vec<CategoryElement>>,

    /// Own property set.
    pub properties: Option<Properties>,

    /// Own template set.
    pub templates: Option<Templates>,
}

impl Categories {
    /// Create an empty category set in `global_namespace`.
    pub fn new(global_namespace: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            global_namespace: global_namespace.into(),
            labels: None,
            categories: VersionedCollection::new(),
            sub_categories: None,
            elements: None,
            properties: None,
            templates: None,
        }
    }

    /// Append an active member category.
    pub fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Append a member category already marked deleted in the source.
    pub fn push_deleted_category(&mut self, category: Category) {
        self.categories.push_deleted(category);
    }

    /// Soft-delete the named member category.
    pub fn delete_category(&mut self, name: &str) -> bool {
        self.categories.mark_deleted(|c| c.name == name)
    }

    /// Append a flat element, allocating the sequence on first push.
    pub fn push_element(&mut self, element: CategoryElement) {
        self.elements.get_or_insert_with(Vec::new).push(element);
    }

    /// Attach the single nested category tree.
    pub fn set_sub_categories(&mut self, sub: Categories) {
        self.sub_categories = Some(Box::new(sub));
    }

    /// Depth of the sub-category spine, counting this node.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = self.sub_categories.as_deref();
        while let Some(sub) = node {
            depth += 1;
            node = sub.sub_categories.as_deref();
        }
        depth
    }
}

impl Drop for Categories {
    fn drop(&mut self) {
        // Dismantle the sub-category spine iteratively; a recursive drop
        // would overflow the stack on deeply nested documents.
        let mut next = self.sub_categories.take();
        while let Some(mut node) = next {
            next = node.sub_categories.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_and_flat_children_coexist() {
        let mut cats = Categories::new("person");
        cats.push_category(Category::new("_01", "Male"));

        let mut sub = Categories::new("person.detail");
        sub.push_category(Category::new("_02", "Female"));
        cats.set_sub_categories(sub);

        cats.push_element(CategoryElement::new("_e1", "NetAll", "net"));

        assert_eq!(cats.categories.len(), 1);
        assert!(cats.sub_categories.is_some());
        assert_eq!(cats.elements.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn elements_absent_until_first_push() {
        let cats = Categories::new("person");
        assert!(cats.elements.is_none());
    }

    #[test]
    fn delete_records_not_removes() {
        let mut cats = Categories::new("person");
        cats.push_category(Category::new("_01", "Male"));
        cats.push_category(Category::new("_02", "Female"));

        assert!(cats.delete_category("Male"));

        assert_eq!(cats.categories.len(), 1);
        assert_eq!(cats.categories.deleted().len(), 1);
        assert_eq!(cats.categories.deleted()[0].name, "Male");
    }

    #[test]
    fn deep_spine_drops_without_overflow() {
        let mut root = Categories::new("leaf");
        for i in 0..50_000 {
            let mut parent = Categories::new(format!("ns{i}"));
            parent.set_sub_categories(root);
            root = parent;
        }
        assert_eq!(root.depth(), 50_001);
        drop(root);
    }
}
