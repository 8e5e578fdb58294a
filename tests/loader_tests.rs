mod common;

use common::*;
use genchain::prelude::*;
use std::fs;
use std::path::Path;

fn write_chain(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("Failed to write chain file");
}

fn simple_chain(name: &str) -> String {
    format!(
        r#"
name: {}
steps:
  - kind: text_to_image
    params:
      prompt: "a lighthouse at dusk"
"#,
        name
    )
}

#[test]
fn test_load_empty_directory() {
    let dir = create_test_dir();
    let chains = ChainLoader::load_directory(dir.path()).unwrap();
    assert!(chains.is_empty());
}

#[test]
fn test_load_single_chain() {
    let dir = create_test_dir();
    write_chain(dir.path(), "test.yaml", &simple_chain("test-chain"));

    let chains = ChainLoader::load_directory(dir.path()).unwrap();

    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].name.as_deref(), Some("test-chain"));
}

#[test]
fn test_load_multiple_chains() {
    let dir = create_test_dir();
    write_chain(dir.path(), "a.yaml", &simple_chain("chain-a"));
    write_chain(dir.path(), "b.yaml", &simple_chain("chain-b"));
    write_chain(dir.path(), "c.yml", &simple_chain("chain-c"));

    let chains = ChainLoader::load_directory(dir.path()).unwrap();

    assert_eq!(chains.len(), 3);
    let names: Vec<_> = chains.iter().filter_map(|c| c.name.as_deref()).collect();
    assert!(names.contains(&"chain-a"));
    assert!(names.contains(&"chain-b"));
    assert!(names.contains(&"chain-c"));
}

#[test]
fn test_skip_non_yaml_files() {
    let dir = create_test_dir();
    write_chain(dir.path(), "chain.yaml", &simple_chain("real-chain"));
    fs::write(dir.path().join("readme.md"), "# README").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let chains = ChainLoader::load_directory(dir.path()).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].name.as_deref(), Some("real-chain"));
}

#[test]
fn test_skip_providers_yaml() {
    let dir = create_test_dir();
    write_chain(dir.path(), "chain.yaml", &simple_chain("chain"));
    fs::write(
        dir.path().join("providers.yaml"),
        "text_to_image:\n  base_url: https://api.example.com\n  model: flux_schnell\n",
    )
    .unwrap();

    let chains = ChainLoader::load_directory(dir.path()).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].name.as_deref(), Some("chain"));
}

#[test]
fn test_skip_subdirectories() {
    let dir = create_test_dir();
    write_chain(dir.path(), "root.yaml", &simple_chain("root"));

    let subdir = dir.path().join("subdir");
    fs::create_dir(&subdir).unwrap();
    fs::write(subdir.join("nested.yaml"), simple_chain("nested")).unwrap();

    let chains = ChainLoader::load_directory(dir.path()).unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].name.as_deref(), Some("root"));
}

#[test]
fn test_load_file() {
    let dir = create_test_dir();
    let path = dir.path().join("test.yaml");
    fs::write(&path, simple_chain("single-chain")).unwrap();

    let chain = ChainLoader::load_file(&path).unwrap();
    assert_eq!(chain.name.as_deref(), Some("single-chain"));
    assert_eq!(chain.steps.len(), 1);
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = create_test_dir();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "steps: {not: [valid").unwrap();

    let error = ChainLoader::load_file(&path).unwrap_err();
    match error {
        LoadError::Yaml { file, .. } => assert!(file.ends_with("broken.yaml")),
        other => panic!("Expected a YAML error, got {:?}", other),
    }
}
