//! On-disk config scaffolding for tests.
//!
//! Single source of truth for writing TOML config fixtures under a test
//! root. Avoids each test module reimplementing the path/extension
//! convention.

use std::path::Path;

/// Write `contents` as `<root>/<config_path>.toml`, creating parent
/// directories as needed.
pub fn write_config(root: &Path, config_path: &str, contents: &str) {
    let file = root.join(format!("{config_path}.toml"));
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent).expect("create config parent dir");
    }
    std::fs::write(file, contents).expect("write config fixture");
}

/// Canonical echo config: builds the `echo` target with the given prefix.
#[must_use]
pub fn echo_config(prefix: &str) -> String {
    format!("_target_ = \"echo\"\nprefix = \"{prefix}\"\n")
}
