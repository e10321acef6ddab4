// A second crate linked into the same native library as `native_bridge`. Its
// declarations are collected in `native_bridge`'s table, but `qux` was never
// added to `native_bridge/exports.txt`, so the anchor does not retain it.

retainer::enable!(native_bridge);

#[unsafe(no_mangle)]
pub extern "C" fn qux(x: i32) -> i32 {
    x.wrapping_sub(1)
}
retainer::retain!(qux);
