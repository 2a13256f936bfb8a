use compat_core::{CompatConfig, CompatError, Manifest, ManifestError};
use compat_matrix::MatrixError;
use compat_test_utils::{RecordingHost, COMMONS_LANG_BY_JAVA_MANIFEST};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn manifest_file_plans_the_commons_lang_matrix() {
    let file = write_temp(COMMONS_LANG_BY_JAVA_MANIFEST);
    let plan = Manifest::load(file.path())
        .unwrap()
        .into_context()
        .unwrap()
        .plan()
        .unwrap();

    assert_eq!(plan.matrix.len(), 8);
    assert_eq!(plan.adapters.len(), 2);

    let unit = plan
        .matrix
        .get("testCompatibilityWithCommonsLang3_10AndJava11")
        .unwrap();
    assert_eq!(unit.toolchain(), Some("11"));
    assert_eq!(
        unit.system_properties()
            .get("commons.lang.version")
            .map(String::as_str),
        Some("3.10")
    );
    let pins: Vec<String> = unit.constraints().map(ToString::to_string).collect();
    assert_eq!(pins, vec!["org.apache.commons:commons-lang3:3.10!!".to_string()]);

    let adapter = plan.adapters.scope("Lang", "3.0").unwrap();
    assert_eq!(
        adapter.compile_only_pin().map(ToString::to_string),
        Some("org.apache.commons:commons-lang3:3.0!!".to_string())
    );
}

#[test]
fn manifest_settings_rename_scopes_and_lifecycles() {
    let file = write_temp(
        r#"
        [settings]
        test_scope = "functionalTest"
        lifecycle_unit = "matrixCheck"

        [adapters]
        lifecycle_unit = "adapterCheck"

        [[dimension]]
        name = "Java"
        versions = ["17"]

        [[namespace]]
        name = "Lang"
        versions = ["3.10"]
        "#,
    );
    let context = Manifest::load(file.path()).unwrap().into_context().unwrap();
    let mut host = RecordingHost::new();
    context.publish(&mut host).unwrap();

    assert_eq!(
        host.lifecycle("matrixCheck"),
        Some(vec!["testCompatibilityWithJava17".to_string()])
    );
    assert_eq!(
        host.lifecycle("adapterCheck"),
        Some(vec!["testCompatLang3_10".to_string()])
    );
    assert!(host.calls.iter().any(|call| matches!(
        call,
        compat_test_utils::HostCall::Scope { extends, .. }
            if extends == &vec!["functionalTestRuntimeClasspath".to_string()]
    )));
}

#[test]
fn exclude_naming_an_unknown_dimension_fails_planning() {
    let file = write_temp(
        r#"
        [[dimension]]
        name = "Java"
        versions = ["8", "17"]

        [[exclude]]
        Scala = "2.13"
        "#,
    );
    let context = Manifest::load(file.path()).unwrap().into_context().unwrap();
    let err = context.plan().unwrap_err();
    assert!(matches!(
        err,
        CompatError::Matrix(MatrixError::UnknownDimension { ref dimension, .. }) if dimension == "Scala"
    ));
}

#[test]
fn exclude_with_unknown_dimension_after_a_mismatch_fails_planning() {
    let file = write_temp(
        r#"
        [[dimension]]
        name = "CommonsLang"
        versions = ["3.0", "3.5"]

        [[exclude]]
        CommonsLang = "9.9"
        Scala = "2.13"
        "#,
    );
    let context = Manifest::load(file.path()).unwrap().into_context().unwrap();
    let err = context.plan().unwrap_err();
    assert!(err.is_configuration_error());
    assert!(matches!(
        err,
        CompatError::Matrix(MatrixError::UnknownDimension { ref dimension, .. }) if dimension == "Scala"
    ));
}

#[test]
fn manifest_with_unsafe_test_scope_fails_planning() {
    let file = write_temp(
        r#"
        [settings]
        test_scope = "functional test"

        [[dimension]]
        name = "Java"
        versions = ["17"]
        "#,
    );
    let context = Manifest::load(file.path()).unwrap().into_context().unwrap();
    assert!(matches!(
        context.plan(),
        Err(CompatError::Matrix(MatrixError::InvalidTestScope { .. }))
    ));
}

#[test]
fn missing_manifest_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    match Manifest::load(&path) {
        Err(ManifestError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn config_file_overrides_only_given_keys() {
    let file = write_temp(
        r#"
        [matrix]
        fail_on_empty_matrix = true

        [adapters]
        default_target_scope = "plugin"
        "#,
    );
    let config = CompatConfig::load(file.path()).unwrap();
    assert!(config.matrix.fail_on_empty_matrix);
    assert_eq!(config.matrix.test_scope, "test");
    assert_eq!(config.adapters.default_target_scope, "plugin");
    assert_eq!(config.adapters.lifecycle_unit, "testCompatibilityAdapters");
}

#[test]
fn malformed_config_is_a_parse_error() {
    let file = write_temp("[matrix\n");
    assert!(matches!(
        CompatConfig::load(file.path()),
        Err(ManifestError::Parse(_))
    ));
}
