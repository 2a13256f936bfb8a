use compat_adapter::{
    AdapterConfig, AdapterIsolationManager, AdapterState, CompileOutput, CompileRequest,
    ConsumerManifest, Namespace, NamespaceRegistry, SharedScopes,
};
use compat_model::{BoxError, Coordinate, DependencyConstraint, Visibility};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Mutex;

fn lang() -> Coordinate {
    Coordinate::new("org.apache.commons", "commons-lang3").unwrap()
}

fn registry(versions: &[&str]) -> NamespaceRegistry {
    let mut registry = NamespaceRegistry::new();
    registry
        .register_namespace(Namespace::new("Lang", versions.iter().copied()).pinning(lang()))
        .unwrap();
    registry
}

/// Records the versions of `commons-lang3` each compile could see
#[derive(Default)]
struct ViewRecorder {
    views: Mutex<BTreeMap<String, Vec<String>>>,
}

impl ViewRecorder {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, BoxError> {
        let visible = request
            .resolution_view()
            .into_iter()
            .filter(|c| c.coordinate() == &lang())
            .map(|c| c.version().to_string())
            .collect();
        self.views
            .lock()
            .map_err(|_| "poisoned")?
            .insert(request.key().version.clone(), visible);
        Ok(CompileOutput::new(request.scope().name().as_str()))
    }
}

#[test]
fn lang_3_0_and_3_10_compile_in_isolation() {
    let mut manager = AdapterIsolationManager::plan(&registry(&["3.0", "3.10"]), AdapterConfig::default()).unwrap();
    let recorder = ViewRecorder::default();
    let report = manager.compile_all(&|r: &CompileRequest<'_>| recorder.compile(r));
    assert!(report.is_success());

    let views = recorder.views.into_inner().unwrap();
    assert_eq!(views["3.0"], vec!["3.0".to_string()]);
    assert_eq!(views["3.10"], vec!["3.10".to_string()]);
}

#[test]
fn shared_constraints_reach_every_adapter() {
    let mut shared = SharedScopes::default();
    shared
        .implementation
        .add_constraint(
            "com.google.code.findbugs:jsr305:3.0.2".parse().unwrap(),
            Visibility::Implementation,
        )
        .unwrap();
    let mut manager = AdapterIsolationManager::plan(&registry(&["3.0", "3.5"]), AdapterConfig::default())
        .unwrap()
        .with_shared_scopes(shared);

    let seen: Mutex<Vec<usize>> = Mutex::new(Vec::new());
    let report = manager.compile_all(&|r: &CompileRequest<'_>| -> Result<CompileOutput, BoxError> {
        seen.lock().unwrap().push(r.resolution_view().len());
        Ok(CompileOutput::new("out"))
    });
    assert!(report.is_success());
    assert_eq!(seen.into_inner().unwrap(), vec![2, 2]);
}

#[test]
fn published_adapters_leave_no_runtime_requirement() {
    let mut manager = AdapterIsolationManager::plan(&registry(&["3.0", "3.5", "3.10"]), AdapterConfig::default()).unwrap();
    let report = manager.compile_all_parallel(&|r: &CompileRequest<'_>| -> Result<CompileOutput, BoxError> {
        Ok(CompileOutput::new(format!("classes/{}", r.scope().name())))
    });
    assert!(report.is_success());

    let mut manifest = ConsumerManifest::new("example");
    manifest.require(DependencyConstraint::strict(
        Coordinate::new("org.slf4j", "slf4j-api").unwrap(),
        "2.0.9",
    ));
    manager.publish(&mut manifest).unwrap();

    assert!(manager.scopes().all(|s| s.state() == AdapterState::Published));
    assert_eq!(manifest.runtime_requirements().len(), 1);
    let bundled: Vec<_> = manifest.bundled().iter().map(|b| b.artifact.as_str()).collect();
    assert_eq!(
        bundled,
        vec!["classes/compatLang3_0", "classes/compatLang3_5", "classes/compatLang3_10"]
    );
    manifest.verify_runtime_exclusion(&manager).unwrap();
}

proptest! {
    #[test]
    fn prop_parallel_matches_sequential(
        failing in proptest::collection::vec(any::<bool>(), 1..8)
    ) {
        let versions: Vec<String> = (0..failing.len()).map(|i| format!("1.{i}")).collect();
        let mut registry = NamespaceRegistry::new();
        registry.register_namespace(Namespace::new("Lib", versions.clone()).pinning(lang())).unwrap();

        let compiler = |r: &CompileRequest<'_>| -> Result<CompileOutput, BoxError> {
            let index = versions.iter().position(|v| *v == r.key().version).unwrap_or(0);
            if failing[index] {
                Err("broken".into())
            } else {
                Ok(CompileOutput::new(r.key().to_string()))
            }
        };

        let mut sequential = AdapterIsolationManager::plan(&registry, AdapterConfig::default()).unwrap();
        let mut parallel = sequential.clone();
        let a = sequential.compile_all(&compiler);
        let b = parallel.compile_all_parallel(&compiler);

        prop_assert_eq!(&a.compiled, &b.compiled);
        prop_assert_eq!(a.failures.len(), b.failures.len());
        let states_a: Vec<_> = sequential.scopes().map(|s| s.state()).collect();
        let states_b: Vec<_> = parallel.scopes().map(|s| s.state()).collect();
        prop_assert_eq!(states_a, states_b);
    }
}
