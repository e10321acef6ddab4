use native_bridge::{declared_exports, retain_native_symbols, retention_set};
use retainer::{Declaration, Export, ExportManifest, RETAINED};

fn symbol<T: Copy>(export: &Export) -> T {
    assert_eq!(size_of::<T>(), size_of::<*const ()>());
    unsafe {
        // SAFETY: The callers pick `T` to match the export's signature.
        core::mem::transmute_copy(&export.address())
    }
}

#[test]
fn retains_foo_bar_baz() {
    let set = retention_set();
    assert_eq!(set.len(), 3);
    for name in ["foo", "bar", "baz"] {
        assert!(set.contains(name), "{name} is not retained");
    }
}

#[test]
fn anchor_is_idempotent() {
    let results: Vec<i32> = (0..10).map(|_| retain_native_symbols()).collect();
    assert!(results.iter().all(|&status| status == RETAINED));

    assert_eq!(native_bridge::foo(41), 42);
    assert_eq!(native_bridge::bar(6, 7), 42);
}

#[test]
fn anchor_from_many_threads() {
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| retain_native_symbols())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), RETAINED);
        }
    });
}

#[test]
fn retained_symbols_are_callable() {
    let set = retention_set();

    let foo: extern "C" fn(i32) -> i32 = symbol(set.get("foo").unwrap());
    assert_eq!(foo(1), native_bridge::foo(1));

    let bar: extern "C" fn(i32, i32) -> i32 = symbol(set.get("bar").unwrap());
    assert_eq!(bar(-3, 5), -15);

    let baz: unsafe extern "C" fn(*const u8, usize) -> u64 = symbol(set.get("baz").unwrap());
    let input = b"retain";
    let via_set = unsafe { baz(input.as_ptr(), input.len()) };
    let direct = unsafe { native_bridge::baz(input.as_ptr(), input.len()) };
    assert_eq!(via_set, direct);
    assert_eq!(unsafe { baz(core::ptr::null(), 0) }, 0xcbf2_9ce4_8422_2325);
}

#[test]
fn every_declared_export_is_anchored() {
    let declared = declared_exports();
    assert_eq!(declared.len(), 3);
    assert_eq!(retention_set().verify_covers(declared), Ok(()));
}

#[test]
fn only_the_anchor_holds_addresses() {
    // Declarations are kept by the linker regardless of the anchor, so they
    // must not point at the exports. Dropping the call to
    // `retain_native_symbols()` then leaves nothing that references them.
    assert_eq!(size_of::<Declaration>(), size_of::<&'static str>());
    for declared in declared_exports() {
        let anchored = retention_set().get(declared.name()).unwrap();
        assert!(!anchored.address().is_null());
    }
}

#[test]
fn anchor_matches_export_manifest() {
    let manifest = ExportManifest::parse(include_str!("../exports.txt")).unwrap();
    assert_eq!(manifest.check(retention_set()), Ok(()));
}

#[test]
fn header_declares_the_anchor() {
    let header = include_str!("../include/native_bridge.h");
    assert!(header.contains("int32_t retain_native_symbols(void);"));
    for name in retention_set().names() {
        assert!(
            header.contains(&format!(" {name}(")),
            "{name} missing from native_bridge.h"
        );
    }
}
