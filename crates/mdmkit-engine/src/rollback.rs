//! Version rollback
//!
//! Rolling a document back to its base version replaces every versioned
//! property set and leaves the unversioned sets untouched. Traversal uses
//! explicit work stacks; category and field trees have no depth bound.

use mdmkit_model::{
    Categories, Definition, Field, MdmDocument, NodeSettings, Properties, SubFields,
};

/// Clear the versioned values of every property set reachable in the
/// document, keeping all unversioned properties.
///
/// Returns the number of property sets that actually had versioned values
/// to clear.
pub fn rollback_versioned(doc: &mut MdmDocument) -> usize {
    let mut cleared = 0;

    clear(&mut doc.properties, &mut cleared);

    for definition in &mut doc.definitions {
        match definition {
            Definition::Variable(var) => {
                clear_settings(&mut var.settings, &mut cleared);
                if let Some(categories) = var.categories.as_mut() {
                    walk_categories(categories, &mut cleared);
                }
                if let Some(helpers) = var.helper_fields.as_mut() {
                    walk_fields(helpers.items.iter_all_mut().collect(), &mut cleared);
                }
            }
            Definition::OtherVariable(var) => clear_settings(&mut var.settings, &mut cleared),
            Definition::Categories(categories) => walk_categories(categories, &mut cleared),
        }
    }

    if let Some(design) = doc.design.as_mut() {
        walk_fields(design.items.iter_all_mut().collect(), &mut cleared);
    }

    for alias in &mut doc.aliases {
        if let Some(properties) = alias.properties.as_mut() {
            clear(properties, &mut cleared);
        }
    }

    if let Some(languages) = doc.languages.as_mut() {
        for language in languages.items.iter_all_mut() {
            if let Some(properties) = language.properties.as_mut() {
                clear(properties, &mut cleared);
            }
        }
    }

    cleared
}

fn clear(props: &mut Properties, cleared: &mut usize) {
    if !props.values.is_empty() {
        props.clear_versioned();
        *cleared += 1;
    }
}

fn clear_settings(settings: &mut NodeSettings, cleared: &mut usize) {
    if let Some(properties) = settings.properties.as_mut() {
        clear(properties, cleared);
    }
    if let Some(templates) = settings.templates.as_mut() {
        clear(templates, cleared);
    }
    if let Some(label_styles) = settings.label_styles.as_mut() {
        clear(label_styles, cleared);
    }
    if let Some(notes) = settings.notes.as_mut() {
        clear(notes, cleared);
    }
}

fn walk_categories(root: &mut Categories, cleared: &mut usize) {
    let mut stack: Vec<&mut Categories> = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(properties) = node.properties.as_mut() {
            clear(properties, cleared);
        }
        if let Some(templates) = node.templates.as_mut() {
            clear(templates, cleared);
        }
        for category in node.categories.iter_all_mut() {
            if let Some(properties) = category.properties.as_mut() {
                clear(properties, cleared);
            }
            if let Some(templates) = category.templates.as_mut() {
                clear(templates, cleared);
            }
            if let Some(label_styles) = category.label_styles.as_mut() {
                clear(label_styles, cleared);
            }
            if let Some(notes) = category.notes.as_mut() {
                clear(notes, cleared);
            }
        }
        if let Some(sub) = node.sub_categories.as_deref_mut() {
            stack.push(sub);
        }
    }
}

fn walk_fields(roots: Vec<&mut Field>, cleared: &mut usize) {
    let mut stack = roots;
    while let Some(field) = stack.pop() {
        let base = field.base_mut();
        if let Some(properties) = base.properties.as_mut() {
            clear(properties, cleared);
        }
        if let Some(templates) = base.templates.as_mut() {
            clear(templates, cleared);
        }
        if let Some(label_styles) = base.label_styles.as_mut() {
            clear(label_styles, cleared);
        }
        if let Some(notes) = base.notes.as_mut() {
            clear(notes, cleared);
        }

        match field {
            Field::Variable(_) => {}
            Field::Block(block) => {
                if let Some(sub) = block.fields.as_mut() {
                    push_members(&mut stack, sub);
                }
            }
            Field::Loop(looped) => {
                if let Some(categories) = looped.categories.as_mut() {
                    walk_categories(categories, cleared);
                }
                if let Some(sub) = looped.fields.as_mut() {
                    push_members(&mut stack, sub);
                }
            }
        }
    }
}

fn push_members<'a>(stack: &mut Vec<&'a mut Field>, sub: &'a mut SubFields) {
    stack.extend(sub.items.iter_all_mut());
}
