//! Schema registry
//!
//! Holds every registered record type definition. Definitions come from
//! the built-in catalog, programmatic registration, or JSON files loaded
//! from a directory at startup. Registered definitions are immutable.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};

use super::catalog;
use super::errors::{SchemaError, SchemaResult};
use super::record::Record;
use super::types::RecordTypeDef;
use super::validator::{SchemaValidator, UnknownKeyPolicy};
use crate::observability::{log_event_with_fields, Event};

/// In-memory registry of record type definitions.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Definitions in registration order
    definitions: Vec<RecordTypeDef>,
    /// type_name -> index into `definitions`
    by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in catalog.
    pub fn with_builtin() -> SchemaResult<Self> {
        let mut registry = Self::new();
        for def in catalog::builtin_definitions() {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Registers a definition.
    ///
    /// # Errors
    ///
    /// - SCHEMA_DUPLICATE_TYPE if the type name is taken; the existing
    ///   definition is left unchanged
    /// - SCHEMA_MALFORMED_DEFINITION if the structure check fails or the
    ///   collection name is already used by another type
    pub fn register(&mut self, def: RecordTypeDef) -> SchemaResult<()> {
        let result = self.check_registration(&def);
        if let Err(e) = &result {
            log_event_with_fields(
                Event::SchemaRejected,
                &[("type_name", def.type_name.as_str()), ("code", e.code().code())],
            );
            return result;
        }

        let collection = def.collection_name();
        log_event_with_fields(
            Event::SchemaRegistered,
            &[("type_name", def.type_name.as_str()), ("collection", collection.as_str())],
        );

        self.by_name.insert(def.type_name.clone(), self.definitions.len());
        self.definitions.push(def);
        Ok(())
    }

    fn check_registration(&self, def: &RecordTypeDef) -> SchemaResult<()> {
        if self.contains(&def.type_name) {
            return Err(SchemaError::duplicate_type(&def.type_name));
        }

        def.validate_structure()
            .map_err(|e| SchemaError::malformed_definition(&def.type_name, e))?;

        let collection = def.collection_name();
        if let Some(other) = self
            .definitions
            .iter()
            .find(|d| d.collection_name() == collection)
        {
            return Err(SchemaError::malformed_definition(
                &def.type_name,
                format!("collection '{}' is already used by '{}'", collection, other.type_name),
            ));
        }

        Ok(())
    }

    /// Gets a definition by type name.
    pub fn definition(&self, type_name: &str) -> Option<&RecordTypeDef> {
        self.by_name.get(type_name).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    /// Returns the collection name for a registered type.
    pub fn collection_name_for(&self, type_name: &str) -> SchemaResult<String> {
        self.definition(type_name)
            .map(RecordTypeDef::collection_name)
            .ok_or_else(|| SchemaError::unknown_type(type_name))
    }

    /// Type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.type_name.as_str())
    }

    /// (type_name, collection) pairs in registration order.
    pub fn collections(&self) -> Vec<(String, String)> {
        self.definitions
            .iter()
            .map(|d| (d.type_name.clone(), d.collection_name()))
            .collect()
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> &[RecordTypeDef] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Validates raw input, ignoring unknown keys.
    pub fn validate(&self, type_name: &str, raw: &Value) -> SchemaResult<Record> {
        self.validate_with(type_name, raw, UnknownKeyPolicy::default())
    }

    /// Validates raw input under an explicit unknown-key policy.
    pub fn validate_with(
        &self,
        type_name: &str,
        raw: &Value,
        policy: UnknownKeyPolicy,
    ) -> SchemaResult<Record> {
        SchemaValidator::new(self).with_policy(policy).validate(type_name, raw)
    }

    /// Loads every `*.json` definition file in `dir`.
    ///
    /// A missing directory holds no definitions. Non-JSON files are skipped.
    /// Files are loaded in name order. Returns the number registered.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed_definition(
                dir.display().to_string(),
                format!("Failed to read definition directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_definition(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let def = read_definition(path)?;
            self.register(def)?;
        }

        let dir_name = dir.display().to_string();
        let count = paths.len().to_string();
        log_event_with_fields(
            Event::SchemasLoaded,
            &[("dir", dir_name.as_str()), ("count", count.as_str())],
        );

        Ok(paths.len())
    }
}

/// Reads a single definition file.
fn read_definition(path: &Path) -> SchemaResult<RecordTypeDef> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed_definition(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed_definition(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}

/// Saves a definition as `<dir>/<collection>.json`.
///
/// Existing files are never overwritten.
pub fn save_definition(dir: &Path, def: &RecordTypeDef) -> SchemaResult<PathBuf> {
    def.validate_structure()
        .map_err(|e| SchemaError::malformed_definition(&def.type_name, e))?;

    let path = dir.join(format!("{}.json", def.collection_name()));
    if path.exists() {
        return Err(SchemaError::malformed_definition(
            path.display().to_string(),
            "definition file already exists",
        ));
    }

    fs::create_dir_all(dir).map_err(|e| {
        SchemaError::malformed_definition(
            dir.display().to_string(),
            format!("Failed to create definition directory: {}", e),
        )
    })?;

    let content = serde_json::to_string_pretty(def).map_err(|e| {
        SchemaError::malformed_definition(
            path.display().to_string(),
            format!("Failed to serialize definition: {}", e),
        )
    })?;

    fs::write(&path, content).map_err(|e| {
        SchemaError::malformed_definition(path.display().to_string(), format!("Failed to write file: {}", e))
    })?;

    Ok(path)
}

/// Process-wide registry, populated with the built-in catalog on first use.
pub fn global() -> &'static RwLock<SchemaRegistry> {
    static GLOBAL: OnceLock<RwLock<SchemaRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(builtin_or_empty(SchemaRegistry::with_builtin())))
}

/// An invalid catalog leaves the registry empty, never half-filled. The
/// failure is logged at ERROR.
fn builtin_or_empty(result: SchemaResult<SchemaRegistry>) -> SchemaRegistry {
    match result {
        Ok(registry) => registry,
        Err(e) => {
            log_event_with_fields(
                Event::CatalogFailed,
                &[("code", e.code().code()), ("message", e.message())],
            );
            SchemaRegistry::new()
        }
    }
}

/// Registers a definition in the process-wide registry.
pub fn register(def: RecordTypeDef) -> SchemaResult<()> {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(def)
}

/// Collection name for a type in the process-wide registry.
pub fn collection_name_for(type_name: &str) -> SchemaResult<String> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .collection_name_for(type_name)
}

/// Validates against a type in the process-wide registry.
pub fn validate(type_name: &str, raw: &Value) -> SchemaResult<Record> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .validate(type_name, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::errors::SchemaErrorCode;
    use super::super::types::{FieldDef, ValueType};
    use serde_json::json;
    use tempfile::TempDir;

    fn blog_post() -> RecordTypeDef {
        RecordTypeDef::new(
            "BlogPost",
            vec![
                FieldDef::required("title", ValueType::String),
                FieldDef::with_default("views", ValueType::Int, json!(0)).min(0.0),
            ],
        )
        .with_collection("blogs")
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(blog_post()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definition("BlogPost").unwrap().fields.len(), 2);
        assert!(registry.definition("blogpost").is_none());
    }

    #[test]
    fn test_duplicate_keeps_first_definition() {
        let mut registry = SchemaRegistry::new();
        registry.register(blog_post()).unwrap();

        let replacement = RecordTypeDef::new("BlogPost", vec![FieldDef::required("body", ValueType::String)]);
        let err = registry.register(replacement).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateType);
        assert_eq!(registry.definition("BlogPost"), Some(&blog_post()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_definition_not_registered() {
        let mut registry = SchemaRegistry::new();
        let def = RecordTypeDef::new(
            "Broken",
            vec![
                FieldDef::required("a", ValueType::String),
                FieldDef::required("a", ValueType::Int),
            ],
        );
        let err = registry.register(def).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedDefinition);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_collection_clash_rejected() {
        let mut registry = SchemaRegistry::new();
        registry.register(blog_post()).unwrap();
        let clash = RecordTypeDef::new("Blogs", vec![FieldDef::required("x", ValueType::String)]);
        let err = registry.register(clash).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedDefinition);
        assert!(err.message().contains("already used by 'BlogPost'"));
    }

    #[test]
    fn test_collection_name_for() {
        let mut registry = SchemaRegistry::new();
        registry.register(blog_post()).unwrap();
        registry
            .register(RecordTypeDef::new("Comment", vec![FieldDef::required("text", ValueType::String)]))
            .unwrap();

        assert_eq!(registry.collection_name_for("BlogPost").unwrap(), "blogs");
        assert_eq!(registry.collection_name_for("Comment").unwrap(), "comment");
        let err = registry.collection_name_for("Nope").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownType);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = SchemaRegistry::with_builtin().unwrap();
        let names: Vec<_> = registry.type_names().collect();
        assert_eq!(names, vec!["User", "Product", "PartnerLead"]);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("definitions");

        let path = save_definition(&dir, &blog_post()).unwrap();
        assert!(path.ends_with("blogs.json"));

        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir(&dir).unwrap(), 1);
        assert_eq!(registry.definition("BlogPost"), Some(&blog_post()));
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        save_definition(temp_dir.path(), &blog_post()).unwrap();
        assert!(save_definition(temp_dir.path(), &blog_post()).is_err());
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir(&temp_dir.path().join("absent")).unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_skips_non_json_and_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.txt"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir(temp_dir.path()).unwrap(), 0);

        fs::write(temp_dir.path().join("bad.json"), "{ nope").unwrap();
        let err = registry.load_dir(temp_dir.path()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedDefinition);
        assert!(err.message().contains("Invalid JSON"));
    }

    #[test]
    fn test_failed_catalog_leaves_registry_empty() {
        let registry = builtin_or_empty(Err(SchemaError::duplicate_type("User")));
        assert!(registry.is_empty());

        let registry = builtin_or_empty(SchemaRegistry::with_builtin());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_global_registry_has_builtin_types() {
        assert_eq!(collection_name_for("User").unwrap(), "user");
        let record = validate(
            "Product",
            &json!({"title": "Pen", "price": 1.5, "category": "office"}),
        )
        .unwrap();
        assert_eq!(record.collection(), "product");
    }
}
