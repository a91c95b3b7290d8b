//! Integration tests for the TOML config source: composition, overrides,
//! and the shape of the resolved tree.

use reqm::config::{ConfigSource, TomlConfigSource};
use reqm::error::ConfigError;
use reqm::testkit::config::write_config;
use reqm::Value;

use tempfile::TempDir;

fn source() -> (TempDir, TomlConfigSource) {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = TomlConfigSource::new(dir.path());
    (dir, source)
}

#[test]
fn args_preserve_toml_types() {
    let (dir, source) = source();
    write_config(
        dir.path(),
        "typed",
        r#"
_target_ = "unit"
name = "quant"
count = 4
ratio = 0.25
enabled = true
tags = ["a", "b"]

[limits]
max = 10
"#,
    );

    let tree = source.resolve("typed", &[]).expect("resolves");
    assert_eq!(tree.target(), "unit");
    assert_eq!(tree.arg("name"), Some(&Value::String("quant".into())));
    assert_eq!(tree.arg("count"), Some(&Value::from(4)));
    assert_eq!(tree.arg("ratio"), Some(&Value::from(0.25)));
    assert_eq!(tree.arg("enabled"), Some(&Value::Bool(true)));
    assert_eq!(
        tree.arg("tags"),
        Some(&Value::Array(vec!["a".into(), "b".into()]))
    );
    assert_eq!(tree.arg("limits").and_then(|v| v.get("max")), Some(&Value::from(10)));
}

#[test]
fn extends_chains_merge_deeply_with_child_precedence() {
    let (dir, source) = source();
    write_config(
        dir.path(),
        "base",
        "_target_ = \"unit\"\n[limits]\nmax = 10\nmin = 1\n",
    );
    write_config(
        dir.path(),
        "mid",
        "extends = \"base\"\n[limits]\nmax = 20\n",
    );
    write_config(dir.path(), "leaf", "extends = \"mid\"\nlabel = \"leaf\"\n");

    let tree = source.resolve("leaf", &[]).expect("resolves");
    assert_eq!(tree.target(), "unit");
    assert_eq!(tree.arg("label"), Some(&Value::String("leaf".into())));
    let limits = tree.arg("limits").expect("limits table survives the chain");
    assert_eq!(limits.get("max"), Some(&Value::from(20)));
    assert_eq!(limits.get("min"), Some(&Value::from(1)));
}

#[test]
fn extends_cycles_fail_with_a_named_path() {
    let (dir, source) = source();
    write_config(dir.path(), "ouro", "extends = \"boros\"\n");
    write_config(dir.path(), "boros", "extends = \"ouro\"\n");

    let err = source.resolve("ouro", &[]).expect_err("cycle");
    match err {
        ConfigError::CircularExtends { path } => assert!(path.contains("ouro")),
        other => panic!("expected CircularExtends, got {other:?}"),
    }
}

#[test]
fn overrides_apply_after_composition() {
    let (dir, source) = source();
    write_config(dir.path(), "base", "_target_ = \"unit\"\nlevel = 1\n");
    write_config(dir.path(), "leaf", "extends = \"base\"\nlevel = 2\n");

    let tree = source
        .resolve("leaf", &["level=3".to_string()])
        .expect("resolves");
    assert_eq!(tree.arg("level"), Some(&Value::from(3)));
}

#[test]
fn dotted_overrides_reach_into_tables() {
    let (dir, source) = source();
    write_config(
        dir.path(),
        "unit",
        "_target_ = \"unit\"\n[limits]\nmax = 10\n",
    );

    let tree = source
        .resolve("unit", &["limits.max=99".to_string()])
        .expect("resolves");
    assert_eq!(
        tree.arg("limits").and_then(|v| v.get("max")),
        Some(&Value::from(99))
    );
}

#[test]
fn unquoted_override_values_fall_back_to_strings() {
    let (dir, source) = source();
    write_config(dir.path(), "unit", "_target_ = \"unit\"\n");

    let tree = source
        .resolve("unit", &["greeting=Hello there".to_string()])
        .expect("resolves");
    assert_eq!(
        tree.arg("greeting"),
        Some(&Value::String("Hello there".into()))
    );
}

#[test]
fn parse_errors_name_the_file() {
    let (dir, source) = source();
    write_config(dir.path(), "mangled", "_target_ = [unclosed\n");

    let err = source.resolve("mangled", &[]).expect_err("bad toml");
    match err {
        ConfigError::Parse { path, .. } => assert!(path.contains("mangled")),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn resolution_failures_are_config_errors_not_panics() {
    let (_dir, source) = source();
    assert!(matches!(
        source.resolve("absent", &[]),
        Err(ConfigError::NotFound { .. })
    ));
}
