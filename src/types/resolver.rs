//! Structure name resolution
//!
//! Structure references are resolved by lookup in a catalog the host
//! application fills once at startup, from explicit registrations and
//! optionally from a directory of descriptor files (`<dir>/*.json`).
//! Resolution never evaluates caller-supplied input; an unknown name is an
//! ordinary `None`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::descriptor::StructDescriptor;
use super::errors::{CatalogError, CatalogResult};

/// Narrow lookup the type registry uses to resolve structure names.
pub trait StructResolver: Send + Sync {
    /// Resolve a structure name to its descriptor
    fn resolve(&self, name: &str) -> Option<Arc<StructDescriptor>>;
}

/// In-memory catalog of structures eligible for `struct`-typed attributes.
#[derive(Debug, Default)]
pub struct StructCatalog {
    structs: HashMap<String, Arc<StructDescriptor>>,
}

impl StructCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor.
    ///
    /// Registrations are immutable: registering a name twice fails.
    pub fn register(&mut self, descriptor: StructDescriptor) -> CatalogResult<()> {
        descriptor
            .validate_structure()
            .map_err(|reason| CatalogError::InvalidDescriptor {
                name: descriptor.name.clone(),
                reason,
            })?;

        if self.structs.contains_key(&descriptor.name) {
            return Err(CatalogError::AlreadyRegistered(descriptor.name));
        }

        self.structs
            .insert(descriptor.name.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Loads every `*.json` descriptor file in `dir`.
    ///
    /// A missing directory loads nothing. Any unreadable or malformed file
    /// aborts the load. Returns the number of descriptors loaded.
    pub fn load_dir(&mut self, dir: &Path) -> CatalogResult<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| CatalogError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        // Sort for a deterministic registration order
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        Ok(paths.len())
    }

    /// Loads a single descriptor file.
    fn load_file(&mut self, path: &Path) -> CatalogResult<()> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let descriptor: StructDescriptor =
            serde_json::from_str(&content).map_err(|e| CatalogError::MalformedFile {
                path: path.display().to_string(),
                reason: format!("Invalid JSON: {}", e),
            })?;

        self.register(descriptor)
    }

    /// Gets a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&StructDescriptor> {
        self.structs.get(name).map(Arc::as_ref)
    }

    /// Registered structure names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.structs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered structures.
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

impl StructResolver for StructCatalog {
    fn resolve(&self, name: &str) -> Option<Arc<StructDescriptor>> {
        self.structs.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use tempfile::TempDir;

    fn link() -> StructDescriptor {
        StructDescriptor::new("Link", Vec::new()).with_field("href", Value::string(""))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut catalog = StructCatalog::new();
        catalog.register(link()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("Link").unwrap().name, "Link");
        assert!(catalog.resolve("Button").is_none());
    }

    #[test]
    fn test_registration_immutable() {
        let mut catalog = StructCatalog::new();
        catalog.register(link()).unwrap();

        let result = catalog.register(link());
        assert!(matches!(result, Err(CatalogError::AlreadyRegistered(ref n)) if n == "Link"));
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut catalog = StructCatalog::new();
        let result = catalog.register(StructDescriptor::new("", Vec::new()));
        assert!(matches!(result, Err(CatalogError::InvalidDescriptor { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("link.json"),
            r#"{"name": "Link", "fields": [{"name": "href", "default": ""}]}"#,
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("button.json"),
            r#"{"name": "Button", "fields": []}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not a descriptor").unwrap();

        let mut catalog = StructCatalog::new();
        let loaded = catalog.load_dir(temp_dir.path()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(catalog.names(), vec!["Button", "Link"]);
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = StructCatalog::new();
        let loaded = catalog.load_dir(&temp_dir.path().join("absent")).unwrap();
        assert_eq!(loaded, 0);
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ not json").unwrap();

        let mut catalog = StructCatalog::new();
        let result = catalog.load_dir(temp_dir.path());
        assert!(matches!(result, Err(CatalogError::MalformedFile { .. })));
    }
}
