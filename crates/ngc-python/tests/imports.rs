//! Scripts reaching the bridge modules through `import`
//!
//! Kept in its own test binary: `sys.modules` is process-wide and is rebound
//! on every invocation.

use ngc_python::{
    Bridge, BridgeSettings, CallOutcome, EmbeddingStatus, InterpContext, Interpreter,
    RecordingCanon, StandaloneInterp, CALL_ARITY,
};
use parking_lot::Mutex;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SCRIPT: &str = r#"
import InterpMod
from CanonMod import MESSAGE

assert InterpMod.__doc__.startswith("Interpreter introspection")

def m6(args, **kwargs):
    import CanonMod
    InterpMod.interp.current_pocket = InterpMod.interp.selected_pocket
    InterpMod.interp.toolchange_flag = True
    MESSAGE("tool change")
    CanonMod.CHANGE_TOOL(InterpMod.interp.selected_pocket)
    return InterpMod.interp.call_level
"#;

#[test]
fn test_modules_are_importable_per_bridge() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("toolchange.py"), SCRIPT).unwrap();

    let first = Arc::new(Mutex::new(StandaloneInterp::new(CALL_ARITY)));
    let second = Arc::new(Mutex::new(StandaloneInterp::new(CALL_ARITY)));
    let canon = Arc::new(Mutex::new(RecordingCanon::new()));

    let mut bridges: Vec<Bridge> = [&first, &second]
        .into_iter()
        .map(|interp| {
            Bridge::new(
                BridgeSettings::new("toolchange.py").with_module_dir(dir.path()),
                InterpContext::new(interp, Arc::clone(&canon)),
            )
        })
        .collect();
    for bridge in &mut bridges {
        assert_eq!(bridge.initialize().unwrap(), EmbeddingStatus::Ok);
    }

    assert_eq!(bridges[0].callables(), vec!["m6".to_string()]);

    first.lock().setup_mut().selected_pocket = 4;
    first.lock().enter_call(&[]);
    second.lock().setup_mut().selected_pocket = 9;

    assert_eq!(
        bridges[0].invoke("m6", &[0.0; CALL_ARITY]).unwrap(),
        CallOutcome::Value(1.0)
    );
    assert_eq!(
        bridges[1].invoke("m6", &[0.0; CALL_ARITY]).unwrap(),
        CallOutcome::Value(0.0)
    );

    assert_eq!(first.lock().setup().current_pocket, 4);
    assert!(first.lock().setup().toolchange_flag);
    assert_eq!(second.lock().setup().current_pocket, 9);

    let names: Vec<_> = canon.lock().calls().iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec!["MESSAGE", "CHANGE_TOOL", "MESSAGE", "CHANGE_TOOL"]
    );
}
