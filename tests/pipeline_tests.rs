//! End-to-end tests for the build pipeline: register → get → call, plus
//! one test per failure stage, against real TOML configs on disk.

use reqm::error::{BuildError, Error, InstantiationError, RegistryError};
use reqm::testkit::config::{echo_config, write_config};
use reqm::testkit::quants::{EchoQuant, PlainWidget, SilentQuant};
use reqm::{Inputs, Interface, Reqm, Value};

use tempfile::TempDir;

fn reqm_with_echo() -> (TempDir, Reqm) {
    let dir = tempfile::tempdir().expect("tempdir");
    let reqm = Reqm::with_root(dir.path());
    reqm.register_target::<EchoQuant>("echo");
    (dir, reqm)
}

#[test]
fn get_returns_a_validated_instance() {
    let (dir, reqm) = reqm_with_echo();
    write_config(dir.path(), "echo/v1", &echo_config("X: "));
    reqm.register("echo/v1", "echo/v1", Interface::of::<EchoQuant>())
        .expect("registration succeeds");

    let quant = reqm.get("echo/v1").expect("build succeeds");
    let out = quant
        .call(&Inputs::new().with("text", "hi"))
        .expect("call succeeds");
    assert_eq!(out, Value::String("X: hi".into()));
}

#[test]
fn repeated_gets_build_independently() {
    let (dir, reqm) = reqm_with_echo();
    write_config(dir.path(), "echo/v1", &echo_config("X: "));
    reqm.register("echo/v1", "echo/v1", Interface::of::<EchoQuant>())
        .unwrap();

    // Each get re-resolves, re-instantiates, and re-runs the self-test;
    // both instances must work.
    let first = reqm.get("echo/v1").expect("first build");
    let second = reqm.get("echo/v1").expect("second build");
    for quant in [first, second] {
        let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
        assert_eq!(out, Value::String("X: hi".into()));
    }
}

#[test]
fn unregistered_alias_is_always_not_found() {
    let (_dir, reqm) = reqm_with_echo();

    let err = reqm.get("ghost/v1").expect_err("never registered");
    assert!(matches!(
        err,
        Error::Registry(RegistryError::NotFound { alias }) if alias == "ghost/v1"
    ));
}

#[test]
fn missing_config_file_is_a_config_resolution_failure() {
    let (_dir, reqm) = reqm_with_echo();
    reqm.register("echo/v1", "echo/v1", Interface::of::<EchoQuant>())
        .unwrap();

    let err = reqm.get("echo/v1").expect_err("no file on disk");
    match err {
        Error::Build(BuildError::ConfigResolution {
            alias, config_path, ..
        }) => {
            assert_eq!(alias, "echo/v1");
            assert_eq!(config_path, "echo/v1");
        }
        other => panic!("expected ConfigResolution, got {other:?}"),
    }
}

#[test]
fn constructor_failure_is_an_instantiation_failure_naming_the_alias() {
    let (dir, reqm) = reqm_with_echo();
    reqm.register_target_fn::<EchoQuant, _>("exploding", |_| {
        anyhow::bail!("constructor raised")
    });
    write_config(dir.path(), "broken/v1", "_target_ = \"exploding\"\n");
    reqm.register("broken/v1", "broken/v1", Interface::of::<EchoQuant>())
        .unwrap();

    let err = reqm.get("broken/v1").expect_err("constructor fails");
    match err {
        Error::Build(BuildError::Instantiation {
            alias,
            target,
            source: InstantiationError::Constructor { .. },
        }) => {
            assert_eq!(alias, "broken/v1");
            assert_eq!(target, "exploding");
        }
        other => panic!("expected Instantiation, got {other:?}"),
    }
}

#[test]
fn constructor_arg_mismatch_is_an_instantiation_failure() {
    let (dir, reqm) = reqm_with_echo();
    // EchoQuant requires a string `prefix`; the config provides an integer.
    write_config(dir.path(), "echo/bad", "_target_ = \"echo\"\nprefix = 3\n");
    reqm.register("echo/bad", "echo/bad", Interface::of::<EchoQuant>())
        .unwrap();

    let err = reqm.get("echo/bad").expect_err("args do not deserialize");
    assert!(matches!(
        err,
        Error::Build(BuildError::Instantiation {
            source: InstantiationError::InvalidArgs { .. },
            ..
        })
    ));
}

#[test]
fn non_quant_target_is_an_interface_mismatch() {
    let (dir, reqm) = reqm_with_echo();
    reqm.register_target::<PlainWidget>("widget");
    write_config(dir.path(), "widget/v1", "_target_ = \"widget\"\nsize = 3\n");
    reqm.register("widget/v1", "widget/v1", Interface::of::<EchoQuant>())
        .unwrap();

    let err = reqm.get("widget/v1").expect_err("PlainWidget is no Quant");
    match err {
        Error::Build(BuildError::InterfaceMismatch {
            alias,
            expected,
            actual,
        }) => {
            assert_eq!(alias, "widget/v1");
            assert_eq!(expected, "EchoQuant");
            assert_eq!(actual, "PlainWidget");
        }
        other => panic!("expected InterfaceMismatch, got {other:?}"),
    }
}

#[test]
fn examples_omitting_a_required_input_are_a_self_test_failure() {
    let (dir, reqm) = reqm_with_echo();
    reqm.register_target::<reqm::testkit::quants::LyingQuant>("lying");
    write_config(dir.path(), "lying/v1", "_target_ = \"lying\"\n");
    reqm.register(
        "lying/v1",
        "lying/v1",
        Interface::of::<reqm::testkit::quants::LyingQuant>(),
    )
    .unwrap();

    // The quant satisfies the interface; only its own example inputs are
    // broken. That must surface as a self-test failure, not a mismatch.
    let err = reqm.get("lying/v1").expect_err("self-test fails");
    assert!(matches!(
        err,
        Error::Build(BuildError::SelfTest { alias, .. }) if alias == "lying/v1"
    ));
}

#[test]
fn declaring_no_examples_fails_the_build() {
    let (dir, reqm) = reqm_with_echo();
    reqm.register_target::<SilentQuant>("silent");
    write_config(dir.path(), "silent/v1", "_target_ = \"silent\"\n");
    reqm.register("silent/v1", "silent/v1", Interface::of::<SilentQuant>())
        .unwrap();

    let err = reqm.get("silent/v1").expect_err("no examples declared");
    assert!(matches!(
        err,
        Error::Build(BuildError::NoExampleInputs { alias }) if alias == "silent/v1"
    ));
}

#[test]
fn family_interface_accepts_any_member() {
    let (dir, reqm) = reqm_with_echo();
    reqm.register_target::<SilentQuant>("silent");
    write_config(dir.path(), "echo/v1", &echo_config("X: "));

    let family = Interface::any_of(
        "Echoish",
        [Interface::of::<EchoQuant>(), Interface::of::<SilentQuant>()],
    );
    reqm.register("echo/v1", "echo/v1", family).unwrap();

    let quant = reqm.get("echo/v1").expect("EchoQuant is a family member");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("X: hi".into()));
}

#[test]
fn replacing_a_registration_rebinds_the_alias() {
    let (dir, reqm) = reqm_with_echo();
    write_config(dir.path(), "echo/v1", &echo_config("X: "));
    write_config(dir.path(), "echo/v2", &echo_config("Y: "));
    reqm.register("echo/live", "echo/v1", Interface::of::<EchoQuant>())
        .unwrap();

    let previous = reqm.register_replacing("echo/live", "echo/v2", Interface::of::<EchoQuant>());
    assert!(previous.is_some());

    let quant = reqm.get("echo/live").expect("rebuilds from echo/v2");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("Y: hi".into()));
}

#[test]
fn overrides_change_the_built_instance_without_touching_the_file() {
    let (dir, reqm) = reqm_with_echo();
    write_config(dir.path(), "echo/v1", &echo_config("X: "));
    reqm.register("echo/v1", "echo/v1", Interface::of::<EchoQuant>())
        .unwrap();

    let quant = reqm
        .get_with_overrides("echo/v1", &["prefix=Z: ".to_string()])
        .expect("build succeeds");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("Z: hi".into()));

    // The stored config is untouched: a plain get still sees the file.
    let quant = reqm.get("echo/v1").expect("build succeeds");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("X: hi".into()));
}

#[test]
fn extends_variant_builds_with_inherited_args() {
    let (dir, reqm) = reqm_with_echo();
    write_config(dir.path(), "echo/base", &echo_config("base: "));
    write_config(
        dir.path(),
        "echo/loud",
        "extends = \"echo/base\"\nprefix = \"LOUD: \"\n",
    );
    reqm.register("echo/loud", "echo/loud", Interface::of::<EchoQuant>())
        .unwrap();

    let quant = reqm.get("echo/loud").expect("build succeeds");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("LOUD: hi".into()));
}

#[test]
fn global_facade_round_trips_with_an_absolute_config_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_config(dir.path(), "echo/global", &echo_config("G: "));
    let absolute = dir.path().join("echo/global.toml");
    let absolute = absolute.to_str().expect("utf-8 path");

    reqm::register_target::<EchoQuant>("echo");
    reqm::register("echo/global", absolute, Interface::of::<EchoQuant>())
        .expect("registration succeeds");

    let quant = reqm::get("echo/global").expect("build succeeds");
    let out = quant.call(&Inputs::new().with("text", "hi")).unwrap();
    assert_eq!(out, Value::String("G: hi".into()));
}
