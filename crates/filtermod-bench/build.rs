fn main() {
    // Bench executables link the boundary crate without a host process;
    // tolerate its unresolved host imports (benches never call them).
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    match target_os.as_str() {
        "macos" => {
            println!("cargo:rustc-link-arg-benches=-Wl,-undefined,dynamic_lookup");
        }
        _ => {
            println!("cargo:rustc-link-arg-benches=-Wl,--unresolved-symbols=ignore-all");
        }
    }
}
