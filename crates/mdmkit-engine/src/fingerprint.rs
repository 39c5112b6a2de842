//! Document fingerprinting

use sha2::{Digest, Sha256};

use mdmkit_model::MdmDocument;

/// SHA-256 over the document's canonical JSON serialization, hex-encoded.
///
/// Equal documents produce equal fingerprints; any change to membership,
/// active/deleted partitioning or order changes the fingerprint.
pub fn fingerprint(doc: &MdmDocument) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(doc)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdmkit_model::{Definition, VarDefinition};

    #[test]
    fn equal_documents_equal_fingerprints() {
        let mut a = MdmDocument::new();
        a.definitions
            .push(Definition::Variable(VarDefinition::new("_v1", "age", "long")));
        let b = a.clone();

        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn order_changes_the_fingerprint() {
        let mut a = MdmDocument::new();
        a.definitions
            .push(Definition::Variable(VarDefinition::new("_v1", "age", "long")));
        a.definitions
            .push(Definition::Variable(VarDefinition::new("_v2", "gender", "categorical")));

        let mut b = MdmDocument::new();
        b.definitions
            .push(Definition::Variable(VarDefinition::new("_v2", "gender", "categorical")));
        b.definitions
            .push(Definition::Variable(VarDefinition::new("_v1", "age", "long")));

        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }
}
