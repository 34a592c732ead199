//! Persistent store - workspace discovery and JSON collection files
//!
//! State lives under a `.qct/` directory: three independent JSON files,
//! one per collection (exigences, orders, operations). Each mutation
//! writes the full collections back; a missing file falls back to the
//! seed data on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::core::registry::Registry;
use crate::entities::exigence::{ChecklistItem, ChecklistItemKind, Exigence, SampleRule};
use crate::entities::order::OrderConfig;

/// Workspace data directory name
pub const WORKSPACE_DIR: &str = ".qct";

const EXIGENCES_FILE: &str = "exigences.json";
const ORDERS_FILE: &str = "orders.json";
const OPERATIONS_FILE: &str = "operations.json";

/// Errors from workspace discovery and collection I/O
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no .qct workspace found in this directory or any parent; run `qct init` first")]
    NotFound,

    #[error("workspace already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("failed to create {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A discovered or freshly initialized workspace root
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Initialize a new workspace at `dir`, writing the seed collections
    pub fn init(dir: &Path) -> Result<Self, StoreError> {
        let data_dir = dir.join(WORKSPACE_DIR);
        if data_dir.exists() {
            return Err(StoreError::AlreadyInitialized(data_dir));
        }
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Create {
            path: data_dir.clone(),
            source,
        })?;

        let workspace = Self {
            root: dir.to_path_buf(),
        };
        workspace.save(&seed_registry())?;
        Ok(workspace)
    }

    /// Find a workspace by walking up from the current directory
    pub fn discover() -> Result<Self, StoreError> {
        let cwd = std::env::current_dir().map_err(|source| StoreError::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Self::discover_from(&cwd)
    }

    /// Find a workspace by walking up from `start`
    pub fn discover_from(start: &Path) -> Result<Self, StoreError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(WORKSPACE_DIR).is_dir() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            current = dir.parent();
        }
        Err(StoreError::NotFound)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    /// Load all three collections; missing files fall back to seed data
    pub fn load(&self) -> Result<Registry, StoreError> {
        let dir = self.data_dir();
        let seeds = seed_registry();

        let exigences = read_collection(&dir.join(EXIGENCES_FILE))?
            .unwrap_or_else(|| seeds.exigences().to_vec());
        let orders =
            read_collection(&dir.join(ORDERS_FILE))?.unwrap_or_else(|| seeds.orders().to_vec());
        let operations = read_collection(&dir.join(OPERATIONS_FILE))?.unwrap_or_default();

        Ok(Registry::new(exigences, orders, operations))
    }

    /// Write all three collections back
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let dir = self.data_dir();
        write_collection(&dir.join(EXIGENCES_FILE), registry.exigences())?;
        write_collection(&dir.join(ORDERS_FILE), registry.orders())?;
        write_collection(&dir.join(OPERATIONS_FILE), registry.operations())?;
        Ok(())
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let items = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(items))
}

fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(items).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Seed data for a fresh workspace: one example exigence and one example
/// order referencing it
pub fn seed_registry() -> Registry {
    let exigence = Exigence::new(
        "Standard quality control",
        "STD-CTRL",
        SampleRule {
            pieces_per_sample: Some(30),
            min_samples: Some(1),
            max_samples: Some(10),
        },
        vec![
            ChecklistItem::new("Visual state conforms", ChecklistItemKind::PassFail),
            ChecklistItem::new("Dimensions checked", ChecklistItemKind::PassFail),
            ChecklistItem::new("Observation / remark", ChecklistItemKind::Text),
        ],
    )
    .with_description("Generic checklist for standard orders.");

    let order = OrderConfig::new("CMD-1001", 120, exigence.id.clone())
        .with_notes("Demonstration order.");

    Registry::new(vec![exigence], vec![order], Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_seed_files() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();

        let dir = workspace.data_dir();
        assert!(dir.join(EXIGENCES_FILE).exists());
        assert!(dir.join(ORDERS_FILE).exists());
        assert!(dir.join(OPERATIONS_FILE).exists());

        let registry = workspace.load().unwrap();
        assert_eq!(registry.exigences().len(), 1);
        assert_eq!(registry.orders().len(), 1);
        assert!(registry.operations().is_empty());
        // The seed order references the seed exigence
        let order = &registry.orders()[0];
        assert_eq!(order.order_number, "CMD-1001");
        assert!(registry.exigence(&order.exigence_id).is_some());
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        Workspace::init(tmp.path()).unwrap();
        assert!(matches!(
            Workspace::init(tmp.path()),
            Err(StoreError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        Workspace::init(tmp.path()).unwrap();

        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        let workspace = Workspace::discover_from(&nested).unwrap();
        assert_eq!(workspace.root(), tmp.path());
    }

    #[test]
    fn test_discover_without_workspace_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Workspace::discover_from(tmp.path()),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        let mut registry = workspace.load().unwrap();

        registry.upsert_exigence(crate::core::registry::ExigencePayload {
            id: None,
            name: "Extra".to_string(),
            code: "XTR".to_string(),
            description: None,
            sample_rule: SampleRule::default(),
            checklist: vec![ChecklistItem::new("Check", ChecklistItemKind::PassFail)],
        });
        workspace.save(&registry).unwrap();

        let reloaded = workspace.load().unwrap();
        assert_eq!(reloaded.exigences().len(), 2);
        assert!(reloaded.find_exigence_by_code("XTR").is_some());
    }

    #[test]
    fn test_missing_operations_file_defaults_empty() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        fs::remove_file(workspace.data_dir().join(OPERATIONS_FILE)).unwrap();
        let registry = workspace.load().unwrap();
        assert!(registry.operations().is_empty());
    }

    #[test]
    fn test_corrupt_file_reports_parse_error() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::init(tmp.path()).unwrap();
        fs::write(workspace.data_dir().join(ORDERS_FILE), "not json").unwrap();
        assert!(matches!(
            workspace.load(),
            Err(StoreError::Parse { .. })
        ));
    }
}
