use crate::{
    error::SchemaError,
    node::{EntityDescriptor, RelationHint},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// DescriptorRegistry
///
/// Compiled descriptors keyed by model name. Relation hints resolve lazily
/// against this registry; a hint whose target is not registered resolves to
/// `None` and is never an error.
///

#[derive(Clone, Debug, Default)]
pub struct DescriptorRegistry {
    by_model: BTreeMap<String, Arc<EntityDescriptor>>,
}

impl DescriptorRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_model: BTreeMap::new(),
        }
    }

    /// Register a compiled descriptor under its model name.
    pub fn register(&mut self, descriptor: Arc<EntityDescriptor>) -> Result<(), SchemaError> {
        let model = descriptor.model_name().to_string();
        if self.by_model.contains_key(&model) {
            return Err(SchemaError::DuplicateModel { model });
        }

        self.by_model.insert(model, descriptor);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, model: &str) -> Option<Arc<EntityDescriptor>> {
        self.by_model.get(model).cloned()
    }

    /// Resolve a `...Id` relation hint to its target descriptor.
    ///
    /// Hint stems are field-cased (`customerId` -> `customer`) while model
    /// names are conventionally capitalized, so the lookup is
    /// case-insensitive.
    #[must_use]
    pub fn resolve_relation(&self, hint: &RelationHint) -> Option<Arc<EntityDescriptor>> {
        self.by_model
            .iter()
            .find(|(model, _)| model.eq_ignore_ascii_case(&hint.references))
            .map(|(_, descriptor)| Arc::clone(descriptor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_model.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_model.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile_str;
    use serde_json::json;

    fn descriptor(model: &str, table: &str) -> Arc<EntityDescriptor> {
        let doc = json!({
            "model": model,
            "table": table,
            "fields": { "name": { "type": "string" } }
        });
        Arc::new(compile_str(&doc.to_string()).unwrap())
    }

    #[test]
    fn register_rejects_duplicate_model_names() {
        let mut registry = DescriptorRegistry::new();
        registry.register(descriptor("Customer", "customers")).unwrap();

        let err = registry
            .register(descriptor("Customer", "customers_v2"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateModel { model } if model == "Customer"));
    }

    #[test]
    fn relation_hints_resolve_case_insensitively() {
        let mut registry = DescriptorRegistry::new();
        registry.register(descriptor("Customer", "customers")).unwrap();

        let hint = RelationHint::from_field_name("customerId").unwrap();
        let target = registry.resolve_relation(&hint).unwrap();
        assert_eq!(target.model_name(), "Customer");
    }

    #[test]
    fn unresolvable_hints_are_non_fatal() {
        let registry = DescriptorRegistry::new();
        let hint = RelationHint::from_field_name("vendorId").unwrap();
        assert!(registry.resolve_relation(&hint).is_none());
    }
}
