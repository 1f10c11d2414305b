//! Process-wide entity registry
//!
//! Generated APIs register themselves here once during program
//! initialization. Registration is concurrent-safe and idempotent per key:
//! re-registering an entity type is detected and rejected, never silently
//! overwritten, since consumers may already depend on the registered
//! metadata.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::api::description::ApiDescription;
use crate::error::{Error, Result};
use crate::runtime::EntityInstance;

/// Registry for compiled entity descriptors, keyed by entity type name
static ENTITY_REGISTRY: Lazy<RwLock<HashMap<String, EntityDescriptor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A registered entity: table identity, column list and instance factory
#[derive(Clone)]
pub struct EntityDescriptor {
    pub entity_name: String,
    pub table_name: String,
    /// Column field names in declaration order
    pub columns: Vec<String>,
    factory: Arc<dyn Fn() -> EntityInstance + Send + Sync>,
}

impl EntityDescriptor {
    /// Build a descriptor from an assembled API description
    pub fn from_api(api: &ApiDescription) -> Self {
        let shared = Arc::new(api.clone());

        Self {
            entity_name: api.registration.entity_name.clone(),
            table_name: api.registration.table_name.clone(),
            columns: api.registration.columns.clone(),
            factory: Arc::new(move || EntityInstance::new(&shared)),
        }
    }

    /// Create a fresh instance of the entity
    pub fn new_instance(&self) -> EntityInstance {
        (self.factory)()
    }
}

impl std::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("entity_name", &self.entity_name)
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .finish()
    }
}

/// Register an entity descriptor, rejecting duplicates
///
/// A duplicate entity name is rejected. So is a duplicate table name under a
/// different entity: silently aliasing one table between two column sets
/// would change metadata visible to already-running consumers.
pub fn register(descriptor: EntityDescriptor) -> Result<()> {
    let mut registry = ENTITY_REGISTRY
        .write()
        .expect("entity registry lock poisoned");

    if registry.contains_key(&descriptor.entity_name) {
        return Err(Error::RegistrationError(format!(
            "entity `{}` is already registered",
            descriptor.entity_name
        )));
    }

    if let Some(existing) = registry
        .values()
        .find(|d| d.table_name == descriptor.table_name)
    {
        return Err(Error::RegistrationError(format!(
            "table `{}` is already registered by entity `{}`",
            descriptor.table_name, existing.entity_name
        )));
    }

    tracing::info!(
        entity = %descriptor.entity_name,
        table = %descriptor.table_name,
        columns = descriptor.columns.len(),
        "Registered entity"
    );

    registry.insert(descriptor.entity_name.clone(), descriptor);

    Ok(())
}

/// Look up a registered entity by type name
pub fn lookup(entity_name: &str) -> Option<EntityDescriptor> {
    ENTITY_REGISTRY
        .read()
        .expect("entity registry lock poisoned")
        .get(entity_name)
        .cloned()
}

/// Whether an entity type is registered
pub fn is_registered(entity_name: &str) -> bool {
    ENTITY_REGISTRY
        .read()
        .expect("entity registry lock poisoned")
        .contains_key(entity_name)
}

/// Names of all registered entities
pub fn registered_entities() -> Vec<String> {
    ENTITY_REGISTRY
        .read()
        .expect("entity registry lock poisoned")
        .keys()
        .cloned()
        .collect()
}
