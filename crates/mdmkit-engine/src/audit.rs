//! Deletion audit
//!
//! Soft-deleted members stay in the document so the difference between two
//! versions can be inspected. The audit walks a loaded document with
//! explicit work stacks and reports every deletion site.

use serde::{Deserialize, Serialize};

use mdmkit_model::{Categories, Definition, Field, MdmDocument, Properties, SubFields};

/// One site holding soft-deleted members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Slash-separated path to the owning node.
    pub path: String,

    /// What kind of member was deleted.
    pub kind: String,

    /// Names of the deleted members, in deletion order.
    pub names: Vec<String>,
}

/// Audit output (stable shape, serialized as JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Report creation time (RFC 3339).
    pub timestamp: String,

    /// Total number of soft-deleted members found.
    pub total_deleted: usize,

    /// Every site with at least one deleted member.
    pub entries: Vec<AuditEntry>,
}

impl AuditReport {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Scans a document for soft-deleted members.
#[derive(Debug, Default)]
pub struct DeletionAudit {
    entries: Vec<AuditEntry>,
    total: usize,
}

impl DeletionAudit {
    /// Walk the document and report every deletion site.
    pub fn scan(doc: &MdmDocument) -> AuditReport {
        let mut audit = Self::default();

        audit.properties("properties", &doc.properties);
        audit.record(
            "styles",
            "property",
            doc.styles.deleted().iter().map(|p| p.name.clone()),
        );

        for definition in &doc.definitions {
            match definition {
                Definition::Variable(var) => {
                    let path = format!("definition/{}", var.name);
                    if let Some(categories) = &var.categories {
                        audit.categories(&path, categories);
                    }
                    if let Some(helpers) = &var.helper_fields {
                        audit.fields(
                            &format!("{path}/helperfields"),
                            helpers.items.active(),
                            helpers.items.deleted(),
                        );
                    }
                }
                Definition::OtherVariable(_) => {}
                Definition::Categories(categories) => audit.categories("definition", categories),
            }
        }

        if let Some(design) = &doc.design {
            audit.subfields("design", design);
        }

        if let Some(pages) = &doc.pages {
            audit.record(
                "design/pages",
                "page",
                pages.items.deleted().iter().map(|r| r.name.clone()),
            );
        }

        if let Some(routings) = &doc.routings {
            if let Some(scripts) = &routings.scripts {
                audit.record(
                    "routings/scripts",
                    "scripttype",
                    scripts.deleted().iter().map(|s| s.script_type.clone()),
                );
                for group in scripts.active() {
                    audit.record(
                        &format!("routings/scripts/{}", group.context),
                        "script",
                        group.scripts.deleted().iter().map(|s| s.name.clone()),
                    );
                }
            }
        }

        if let Some(languages) = &doc.languages {
            audit.record(
                "languages",
                "language",
                languages.items.deleted().iter().map(|l| l.name.clone()),
            );
        }
        if let Some(contexts) = &doc.contexts {
            audit.record(
                "contexts",
                "context",
                contexts.items.deleted().iter().map(|c| c.name.clone()),
            );
        }

        AuditReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_deleted: audit.total,
            entries: audit.entries,
        }
    }

    fn record(&mut self, path: &str, kind: &str, names: impl Iterator<Item = String>) {
        let names: Vec<String> = names.collect();
        if names.is_empty() {
            return;
        }
        self.total += names.len();
        self.entries.push(AuditEntry {
            path: path.to_string(),
            kind: kind.to_string(),
            names,
        });
    }

    fn properties(&mut self, path: &str, props: &Properties) {
        self.record(
            path,
            "property",
            props.values.deleted().iter().map(|p| p.name.clone()),
        );
        self.record(
            &format!("{path}/unversioned"),
            "property",
            props.unversioned.deleted().iter().map(|p| p.name.clone()),
        );
    }

    fn categories(&mut self, path: &str, root: &Categories) {
        let mut stack: Vec<(String, &Categories)> = vec![(path.to_string(), root)];
        while let Some((path, node)) = stack.pop() {
            let here = match node.name.as_deref() {
                Some(name) if !name.is_empty() => format!("{path}/{name}"),
                _ => format!("{path}/categories"),
            };
            self.record(
                &here,
                "category",
                node.categories.deleted().iter().map(|c| c.name.clone()),
            );
            if let Some(sub) = node.sub_categories.as_deref() {
                stack.push((here, sub));
            }
        }
    }

    fn subfields(&mut self, path: &str, fields: &SubFields) {
        self.fields(path, fields.items.active(), fields.items.deleted());
    }

    fn fields(&mut self, path: &str, active: &[Field], deleted: &[Field]) {
        let mut stack: Vec<(String, &[Field], &[Field])> =
            vec![(path.to_string(), active, deleted)];
        while let Some((path, active, deleted)) = stack.pop() {
            self.record(
                &path,
                "field",
                deleted.iter().map(|f| f.name().to_string()),
            );
            for field in active.iter().chain(deleted) {
                match field {
                    Field::Variable(_) => {}
                    Field::Block(block) => {
                        if let Some(sub) = &block.fields {
                            stack.push((
                                format!("{path}/{}", block.base.name),
                                sub.items.active(),
                                sub.items.deleted(),
                            ));
                        }
                    }
                    Field::Loop(looped) => {
                        if let Some(categories) = &looped.categories {
                            self.categories(&format!("{path}/{}", looped.base.name), categories);
                        }
                        if let Some(sub) = &looped.fields {
                            stack.push((
                                format!("{path}/{}", looped.base.name),
                                sub.items.active(),
                                sub.items.deleted(),
                            ));
                        }
                    }
                }
            }
        }
    }
}
