//! Tests for the index state machine and the catalog query interface.

use cube_analyst::index::ReloadError;
use cube_analyst::{QueryError, SemanticIndex};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const ORDERS_LAYER: &str = r#"{"cube":"Orders","field":"net_sales","kind":"measure","description":"Total net sales"}
{"cube":"Orders","field":"product_brand","kind":"dimension","description":"Brand name"}
{"cube":"Goods","field":"net_sales","kind":"measure","description":"Net sales of goods"}
"#;

const BUYER_LAYER: &str = r#"{"cube":"Buyer","field":"city","kind":"dimension","description":"Buyer city"}
"#;

fn write_layer(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// State machine
// ============================================================================

#[test]
fn test_queries_require_load() {
    let index = SemanticIndex::new();

    assert!(!index.is_loaded());
    assert_eq!(index.list_cubes().unwrap_err(), QueryError::NotLoaded);
    assert_eq!(index.get_cube("Orders").unwrap_err(), QueryError::NotLoaded);
    assert_eq!(index.search("sales").unwrap_err(), QueryError::NotLoaded);
    assert_eq!(index.list_dimensions(None).unwrap_err(), QueryError::NotLoaded);
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_layer(&dir, "layer.txt", ORDERS_LAYER);

    let index = SemanticIndex::new();
    let report = index.load(&path).unwrap();

    assert!(index.is_loaded());
    assert_eq!(report.loaded_count, 3);
    assert!(report.skipped_lines.is_empty());
    assert_eq!(index.source_path(), Some(path));
}

#[test]
fn test_failed_first_load_stays_unloaded() {
    let dir = TempDir::new().unwrap();
    let index = SemanticIndex::new();

    assert!(index.load(&dir.path().join("missing.txt")).is_err());
    assert!(!index.is_loaded());
    assert_eq!(index.list_cubes().unwrap_err(), QueryError::NotLoaded);
}

#[test]
fn test_failed_load_keeps_previous_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_layer(&dir, "layer.txt", ORDERS_LAYER);

    let index = SemanticIndex::new();
    index.load(&path).unwrap();

    assert!(index.load(&dir.path().join("missing.txt")).is_err());

    let cubes = index.list_cubes().unwrap();
    assert_eq!(cubes.len(), 2);
    assert_eq!(index.source_path(), Some(path));
}

#[test]
fn test_reload_replaces_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_layer(&dir, "layer.txt", ORDERS_LAYER);

    let index = SemanticIndex::new();
    index.load(&path).unwrap();
    let old = index.catalog().unwrap();

    fs::write(&path, BUYER_LAYER).unwrap();
    let report = index.reload().unwrap();

    assert_eq!(report.loaded_count, 1);
    let names: Vec<_> = index
        .list_cubes()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Buyer"]);

    // Snapshots taken before the reload are untouched
    assert_eq!(old.cube_count(), 2);
}

#[test]
fn test_failed_reload_keeps_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_layer(&dir, "layer.txt", ORDERS_LAYER);

    let index = SemanticIndex::new();
    index.load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(matches!(index.reload(), Err(ReloadError::Load(_))));
    assert_eq!(index.list_cubes().unwrap().len(), 2);
}

#[test]
fn test_reload_before_load() {
    let index = SemanticIndex::new();
    assert!(matches!(index.reload(), Err(ReloadError::NoSource)));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_list_cubes_is_deterministic() {
    let index = SemanticIndex::new();
    index.load_str(ORDERS_LAYER);

    let first = index.list_cubes().unwrap();
    let second = index.list_cubes().unwrap();
    assert_eq!(first, second);

    let names: Vec<_> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Orders", "Goods"]);
}

#[test]
fn test_get_cube_not_found() {
    let index = SemanticIndex::new();
    index.load_str(ORDERS_LAYER);
    let before = index.catalog().unwrap();

    assert_eq!(
        index.get_cube("NoSuchCube").unwrap_err(),
        QueryError::NotFound {
            name: "NoSuchCube".to_string()
        }
    );
    assert_eq!(*index.catalog().unwrap(), *before);
}

#[test]
fn test_get_cube_is_case_sensitive() {
    let index = SemanticIndex::new();
    index.load_str(ORDERS_LAYER);

    assert!(index.get_cube("Orders").is_ok());
    assert!(matches!(
        index.get_cube("orders"),
        Err(QueryError::NotFound { .. })
    ));
}

#[test]
fn test_empty_catalog_is_loaded() {
    let index = SemanticIndex::new();
    let report = index.load_str("not a record\n");

    assert!(index.is_loaded());
    assert_eq!(report.loaded_count, 0);
    assert_eq!(report.skipped_lines.len(), 1);
    assert!(index.list_cubes().unwrap().is_empty());
    assert!(index.search("anything").unwrap().is_empty());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_reads_during_reloads() {
    let index = Arc::new(SemanticIndex::new());
    index.load_str(ORDERS_LAYER);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for _ in 0..200 {
                    let cubes = index.list_cubes().unwrap();
                    // Either the full Orders layer or the full Buyer layer
                    match cubes.len() {
                        2 => assert_eq!(cubes[0].name, "Orders"),
                        1 => assert_eq!(cubes[0].name, "Buyer"),
                        n => panic!("partial catalog with {} cubes", n),
                    }
                }
            })
        })
        .collect();

    for i in 0..50 {
        let layer = if i % 2 == 0 { BUYER_LAYER } else { ORDERS_LAYER };
        index.load_str(layer);
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
