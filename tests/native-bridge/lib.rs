// A stand-in for a native library whose exports are only ever resolved by
// name at runtime. Nothing in a host binary calls `foo`, `bar`, or `baz`
// directly, so without the anchor they are stripped when linked statically.

retainer::enable!();

include!(concat!(env!("OUT_DIR"), "/retain_native_symbols.rs"));

#[unsafe(no_mangle)]
pub extern "C" fn foo(x: i32) -> i32 {
    x.wrapping_add(1)
}
retainer::retain!(foo);

#[unsafe(no_mangle)]
pub extern "C" fn bar(x: i32, y: i32) -> i32 {
    x.wrapping_mul(y)
}
retainer::retain!(bar);

/// FNV-1a over `len` bytes at `bytes`.
///
/// # Safety
///
/// `bytes` must be valid for reads of `len` bytes, or `len` must be zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn baz(bytes: *const u8, len: usize) -> u64 {
    let bytes = if len == 0 {
        &[][..]
    } else {
        unsafe {
            // SAFETY: Guaranteed by the caller.
            core::slice::from_raw_parts(bytes, len)
        }
    };
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
retainer::retain!(baz);
