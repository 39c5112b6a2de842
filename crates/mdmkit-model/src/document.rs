//! The document root

use serde::{Deserialize, Serialize};

use crate::alias::AliasVariable;
use crate::collection::VersionedCollection;
use crate::definition::Definition;
use crate::field::{Pages, SubFields};
use crate::property::{Properties, Styles};
use crate::routing::Routings;

/// A data-source connection declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection name.
    pub name: String,

    /// Database location.
    pub db_location: String,

    /// Data-source component name.
    pub cdsc_name: String,

    /// Project name.
    pub project: String,

    /// Connection id.
    pub id: String,
}

/// The document's data-source section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    /// Name of the default connection.
    pub default_source: Option<String>,

    /// Declared connections in markup order.
    pub connections: Vec<Connection>,
}

/// One declared interview language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Language name (e.g. "en-US").
    pub name: String,

    /// Language id.
    pub id: String,

    /// Own property set.
    pub properties: Option<Properties>,
}

/// The document's language section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Languages {
    /// Base language name.
    pub base: String,

    /// Declared languages under version control.
    pub items: VersionedCollection<Language>,
}

/// An alternative name of a context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// Alternative name.
    pub name: String,
}

/// One declared usage context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name.
    pub name: String,

    /// Alternative names; `None` when never declared.
    pub alternatives: Option<VersionedCollection<Alternative>>,
}

/// A context section (usage contexts or label contexts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contexts {
    /// Base context name.
    pub base: String,

    /// Declared contexts under version control.
    pub items: VersionedCollection<Context>,
}

/// An atom declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Atom name.
    pub name: String,
}

/// The user recorded on a save log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User name.
    pub name: String,

    /// File version the user saved.
    pub file_version: String,

    /// Free-form comment.
    pub comment: String,
}

/// One save-log entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveLog {
    /// File version written.
    pub file_version: String,

    /// Version set the save belongs to.
    pub version_set: String,

    /// Saving user name.
    pub user_name: String,

    /// Save date, as written in the source.
    pub date: String,

    /// Save count.
    pub count: String,

    /// Detailed user record.
    pub user: Option<User>,
}

/// One category-map entry: a category name and its numeric value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryId {
    /// Category name.
    pub name: String,

    /// Mapped value.
    pub value: String,
}

/// A variable-instance mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VarInstance {
    /// Instance name.
    pub name: String,

    /// Source type tag.
    pub source_type: String,

    /// Backing variable name.
    pub variable: String,

    /// Fully-qualified instance name.
    pub full_name: String,
}

/// The root of an MDM document.
///
/// Constructed empty, populated once by the reader in a single pass, then
/// read-mostly. Routing and category edits after load go through the same
/// push/mark-deleted operations used during load. Every section is owned by
/// the document; the only cross-references anywhere in the tree are string
/// keys resolved by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MdmDocument {
    /// Tool version that created the document.
    pub create_version: Option<String>,

    /// Tool version that last wrote the document.
    pub last_version: Option<String>,

    /// Document id.
    pub id: Option<String>,

    /// Data version stamp.
    pub data_version: Option<String>,

    /// Data sub-version stamp.
    pub data_sub_version: Option<String>,

    /// System-variable flag, as written.
    pub system_variable: Option<String>,

    /// DB-filter-validation flag, as written.
    pub db_filter_validation: Option<String>,

    /// Namespace declaration of the source markup.
    pub xmlns: Option<String>,

    /// Document-level properties.
    pub properties: Properties,

    /// Document-level style definitions.
    pub styles: Styles,

    /// Data-source declarations.
    pub data_sources: Option<DataSources>,

    /// Variable and shared-category definitions, in markup order.
    pub definitions: Vec<Definition>,

    /// The design tree of fields.
    pub design: Option<SubFields>,

    /// Top-level page references.
    pub pages: Option<Pages>,

    /// Top-level routing section.
    pub routings: Option<Routings>,

    /// Variable-instance mappings.
    pub mappings: Vec<VarInstance>,

    /// Alias variables.
    pub aliases: Vec<AliasVariable>,

    /// Declared languages.
    pub languages: Option<Languages>,

    /// Usage contexts.
    pub contexts: Option<Contexts>,

    /// Label contexts.
    pub label_contexts: Option<Contexts>,

    /// Atom declarations.
    pub atoms: Vec<Atom>,

    /// Category-map entries.
    pub category_map: Vec<CategoryId>,

    /// Save history.
    pub save_logs: Vec<SaveLog>,
}

impl MdmDocument {
    /// Create an empty document, ready for the reader to populate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a definition by name.
    pub fn find_definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::VarDefinition;

    #[test]
    fn starts_empty() {
        let doc = MdmDocument::new();

        assert!(doc.properties.is_empty());
        assert!(doc.styles.is_empty());
        assert!(doc.definitions.is_empty());
        assert!(doc.design.is_none());
        assert!(doc.routings.is_none());
    }

    #[test]
    fn find_definition_by_name() {
        let mut doc = MdmDocument::new();
        doc.definitions
            .push(Definition::Variable(VarDefinition::new("_v1", "age", "long")));

        assert!(doc.find_definition("age").is_some());
        assert!(doc.find_definition("missing").is_none());
    }
}
