#![forbid(unsafe_code)]

/// Unfortunately, we can't use the `migrations_macros` crate to embed the
/// migrations directory into the binary, because the proc macro is not
/// re-run when the migrations directory changes.
///
/// This build script forces a recompile whenever a migration file is added
/// or edited, so `embed_migrations!()` always picks up the current set.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
