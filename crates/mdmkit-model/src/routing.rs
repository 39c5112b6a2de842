//! Interview routing and script containers

use serde::{Deserialize, Serialize};

use crate::collection::VersionedCollection;

/// One script body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Script name.
    pub name: String,

    /// Whether this is the default script, as written in the source.
    pub default: String,

    /// Script text.
    pub text: String,
}

impl Script {
    /// Create a script.
    pub fn new(
        name: impl Into<String>,
        default: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            text: text.into(),
        }
    }
}

/// A typed group of scripts for one interview context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptType {
    /// Format-defined type tag.
    pub script_type: String,

    /// Interview context.
    pub context: String,

    /// Interview modes the scripts apply to.
    pub interview_modes: String,

    /// Keycode usage flag.
    pub use_keycodes: String,

    /// Member scripts under version control.
    pub scripts: VersionedCollection<Script>,
}

impl ScriptType {
    /// Create an empty script group.
    pub fn new(
        script_type: impl Into<String>,
        context: impl Into<String>,
        interview_modes: impl Into<String>,
        use_keycodes: impl Into<String>,
    ) -> Self {
        Self {
            script_type: script_type.into(),
            context: context.into(),
            interview_modes: interview_modes.into(),
            use_keycodes: use_keycodes.into(),
            scripts: VersionedCollection::new(),
        }
    }
}

/// Script groups under version control.
pub type Scripts = VersionedCollection<ScriptType>;

/// One named routing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingItem {
    /// Item name.
    pub name: String,

    /// Routed item.
    pub item: String,
}

/// Conditional-navigation rules for one interview context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    /// Interview context.
    pub context: String,

    /// Interview modes the routing applies to.
    pub interview_modes: String,

    /// Keycode usage flag.
    pub use_keycodes: String,

    /// Named routing items, lazily allocated on first push.
    pub items: Option<Vec<RoutingItem>>,
}

impl Routing {
    /// Create a routing for `context`.
    pub fn new(
        context: impl Into<String>,
        interview_modes: impl Into<String>,
        use_keycodes: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            interview_modes: interview_modes.into(),
            use_keycodes: use_keycodes.into(),
            items: None,
        }
    }

    /// Append a routing item, allocating the sequence on first call.
    /// Duplicates are accepted.
    pub fn push(&mut self, name: impl Into<String>, item: impl Into<String>) {
        self.items.get_or_insert_with(Vec::new).push(RoutingItem {
            name: name.into(),
            item: item.into(),
        });
    }
}

/// The routing section of a schema node.
///
/// `scripts` is `None` when no scripts were ever declared - distinct from an
/// empty collection, which means every declared script was deleted. Both
/// states survive a round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routings {
    /// Section name.
    pub name: String,

    /// Associated scripts; `None` when never declared.
    pub scripts: Option<Scripts>,

    /// Routing entries in markup order.
    pub routing: Vec<Routing>,
}

impl Routings {
    /// Create an empty routing section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scripts: None,
            routing: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_items_lazily_allocated() {
        let mut routing = Routing::new("Web", "1", "0");
        assert!(routing.items.is_none());

        routing.push("Q1", "ask()");
        routing.push("Q1", "ask()");

        // Same arguments append again; length grows by one per call.
        assert_eq!(routing.items.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn absent_scripts_distinct_from_empty() {
        let never_declared = Routings::new("main");
        assert!(never_declared.scripts.is_none());

        let mut all_deleted = Routings::new("main");
        let mut scripts = Scripts::new();
        scripts.push_deleted(ScriptType::new("mrScriptBasic", "Web", "1", "0"));
        all_deleted.scripts = Some(scripts);

        assert!(all_deleted.scripts.is_some());
        assert_eq!(all_deleted.scripts.as_ref().map(|s| s.len()), Some(0));
    }

    #[test]
    fn script_groups_are_versioned() {
        let mut group = ScriptType::new("mrScriptBasic", "Web", "1", "0");
        group.scripts.push(Script::new("init", "true", "' setup"));
        group.scripts.mark_deleted(|s| s.name == "init");

        assert!(group.scripts.active().is_empty());
        assert_eq!(group.scripts.deleted().len(), 1);
    }
}
