//! Integration tests for rewriting docker-compose files with loaded secrets.

mod common;

use common::Tree;
use opskit_secrets::{
    ComposeTargets, DirLevel, MemoryStore, SecretsError, fill_compose_file,
};
use serde_yaml::Value;

const CREDS: &str = "\
# database
POSTGRES_USER=postgres
POSTGRES_PASSWORD=pg-pass
POSTGRES_ADDRESS=localhost:5432
# pgadmin
PGADMIN_DEFAULT_EMAIL=huaccho@email.com
PGADMIN_DEFAULT_PASSWORD=admin-pass
";

const COMPOSE: &str = "\
services:
  db:
    image: postgres:16
    environment:
      - POSTGRES_USER=
      - POSTGRES_PASSWORD=
  pgadmin:
    image: dpage/pgadmin4
    environment:
      - PGADMIN_DEFAULT_EMAIL=
      - PGADMIN_DEFAULT_PASSWORD=
";

fn targets(tree: &Tree) -> ComposeTargets<'_> {
    ComposeTargets {
        env_file: "creds.env",
        compose_file: "docker-compose.yml",
        source: tree.source(),
        dir_level: None,
    }
}

#[test]
fn test_fill_writes_secret_values_into_compose_file() {
    let tree = Tree::new();
    tree.put(DirLevel::Grandparent, "creds.env", CREDS);
    let compose_path = tree.put(DirLevel::Grandparent, "docker-compose.yml", COMPOSE);
    let mut store = MemoryStore::new();

    let outcome = fill_compose_file(&mut store, &targets(&tree), false).unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.compose_path, compose_path);
    assert_eq!(outcome.fill.services.len(), 2);

    let written: Value =
        serde_yaml::from_str(&std::fs::read_to_string(&compose_path).unwrap()).unwrap();
    let db_env = written["services"]["db"]["environment"].as_sequence().unwrap();
    assert_eq!(db_env[0].as_str(), Some("POSTGRES_USER=postgres"));
    assert_eq!(db_env[1].as_str(), Some("POSTGRES_PASSWORD=pg-pass"));
    let pgadmin_env = written["services"]["pgadmin"]["environment"]
        .as_sequence()
        .unwrap();
    assert_eq!(
        pgadmin_env[0].as_str(),
        Some("PGADMIN_DEFAULT_EMAIL=huaccho@email.com")
    );
    assert_eq!(written["services"]["pgadmin"]["image"].as_str(), Some("dpage/pgadmin4"));
}

#[test]
fn test_dry_run_leaves_compose_file_untouched() {
    let tree = Tree::new();
    tree.put(DirLevel::Own, "creds.env", CREDS);
    let compose_path = tree.put(DirLevel::Parent, "docker-compose.yml", COMPOSE);
    let mut store = MemoryStore::new();

    let outcome = fill_compose_file(&mut store, &targets(&tree), true).unwrap();

    assert!(!outcome.written);
    assert!(outcome.fill.document.contains("POSTGRES_PASSWORD=pg-pass"));
    assert_eq!(std::fs::read_to_string(&compose_path).unwrap(), COMPOSE);
}

#[test]
fn test_unknown_key_aborts_before_writing() {
    let tree = Tree::new();
    tree.put(DirLevel::Own, "creds.env", CREDS);
    let compose = format!("{COMPOSE}  extra:\n    environment:\n      - NOT_IN_CREDS=1\n");
    let compose_path = tree.put(DirLevel::Own, "docker-compose.yml", &compose);
    let mut store = MemoryStore::from_iter([("NOT_IN_CREDS", "from-shell")]);

    let err = fill_compose_file(&mut store, &targets(&tree), false).unwrap_err();

    match err {
        SecretsError::NotFound(msg) => assert!(msg.contains("NOT_IN_CREDS")),
        other => panic!("expected NotFound, got {other}"),
    }
    assert_eq!(std::fs::read_to_string(&compose_path).unwrap(), compose);
    assert_eq!(std::fs::read_dir(tree.dir(DirLevel::Own)).unwrap().count(), 3);
}

#[test]
fn test_missing_compose_file_is_not_found() {
    let tree = Tree::new();
    tree.put(DirLevel::Own, "creds.env", CREDS);
    let mut store = MemoryStore::new();

    let err = fill_compose_file(&mut store, &targets(&tree), false).unwrap_err();
    assert!(matches!(err, SecretsError::NotFound(_)));
}

#[test]
fn test_fill_leaves_sibling_files_untouched() {
    let tree = Tree::new();
    tree.put(DirLevel::Own, "creds.env", CREDS);
    tree.put(DirLevel::Own, "docker-compose.yml", COMPOSE);
    let sibling = tree.put(DirLevel::Own, "docker-compose.tmp", "keep me\n");
    let mut store = MemoryStore::new();

    fill_compose_file(&mut store, &targets(&tree), false).unwrap();

    assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "keep me\n");
    let mut names: Vec<String> = std::fs::read_dir(tree.dir(DirLevel::Own))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        ["creds.env", "docker-compose.tmp", "docker-compose.yml", "test_utils.rs"]
    );
}

#[cfg(unix)]
#[test]
fn test_fill_preserves_compose_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tree = Tree::new();
    tree.put(DirLevel::Own, "creds.env", CREDS);
    let compose_path = tree.put(DirLevel::Own, "docker-compose.yml", COMPOSE);
    std::fs::set_permissions(&compose_path, std::fs::Permissions::from_mode(0o600)).unwrap();
    let mut store = MemoryStore::new();

    fill_compose_file(&mut store, &targets(&tree), false).unwrap();

    let mode = std::fs::metadata(&compose_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert!(std::fs::read_to_string(&compose_path).unwrap().contains("pg-pass"));
}
