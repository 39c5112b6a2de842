//! Variable definitions
//!
//! The definition side of the schema: variables with their ranges,
//! categories and helper fields, plus the other/multiplier variables
//! categories may point at.

use serde::{Deserialize, Serialize};

use crate::category::Categories;
use crate::collection::VersionedCollection;
use crate::field::{dismantle_fields, Field};
use crate::label::Labels;
use crate::property::{LabelStyles, Notes, Properties, Styles, Templates};
use crate::range::Range;

/// The settings-and-labels bundle shared by labelled schema nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Own property set.
    pub properties: Option<Properties>,

    /// Own template set.
    pub templates: Option<Templates>,

    /// Own style properties.
    pub styles: Option<Styles>,

    /// Display labels.
    pub labels: Option<Labels>,

    /// Label style properties.
    pub label_styles: Option<LabelStyles>,

    /// Notes attached to the node.
    pub notes: Option<Notes>,
}

impl NodeSettings {
    /// `true` when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.properties.is_none()
            && self.templates.is_none()
            && self.styles.is_none()
            && self.labels.is_none()
            && self.label_styles.is_none()
            && self.notes.is_none()
    }
}

/// A variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDefinition {
    /// Variable id.
    pub id: String,

    /// Variable name.
    pub name: String,

    /// Format-defined variable type.
    pub variable_type: String,

    /// Value bounds.
    pub range: Range,

    /// Response categories.
    pub categories: Option<Categories>,

    /// Helper fields attached to the variable.
    pub helper_fields: Option<HelperFields>,

    /// Settings and labels.
    pub settings: NodeSettings,
}

impl VarDefinition {
    /// Create a bare variable definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        variable_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variable_type: variable_type.into(),
            range: Range::new(),
            categories: None,
            helper_fields: None,
            settings: NodeSettings::default(),
        }
    }
}

/// Which special variable role an [`OtherVarDefinition`] plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtherVarKind {
    /// An "other, specify" variable.
    Other,

    /// A multiplier variable.
    Multiplier,
}

/// An other/multiplier variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherVarDefinition {
    /// Variable id.
    pub id: String,

    /// Variable name.
    pub name: String,

    /// Format-defined variable type.
    pub variable_type: String,

    /// Usage type tag.
    pub usage_type: String,

    /// Role of the variable.
    pub kind: OtherVarKind,

    /// Settings and labels.
    pub settings: NodeSettings,
}

/// One entry of the document's definition section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    /// A variable definition.
    Variable(VarDefinition),

    /// An other/multiplier variable definition.
    OtherVariable(OtherVarDefinition),

    /// A shared category list.
    Categories(Categories),
}

impl Definition {
    /// Definition name, whichever variant holds it.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Variable(v) => Some(&v.name),
            Self::OtherVariable(v) => Some(&v.name),
            Self::Categories(c) => c.name.as_deref(),
        }
    }
}

/// A named, versioned set of helper fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelperFields {
    /// Set id.
    pub id: String,

    /// Set name.
    pub name: String,

    /// Namespace key for qualified lookup.
    pub global_namespace: String,

    /// Member fields under version control.
    pub items: VersionedCollection<Field>,
}

impl HelperFields {
    /// Create an empty helper-field set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        global_namespace: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            global_namespace: global_namespace.into(),
            items: VersionedCollection::new(),
        }
    }
}

impl Drop for HelperFields {
    fn drop(&mut self) {
        dismantle_fields(std::mem::take(&mut self.items));
    }
}
