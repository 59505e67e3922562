fn main() {
    // Link the macOS frameworks the palette window uses
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        println!("cargo:rustc-link-lib=framework=AppKit");
        println!("cargo:rustc-link-lib=framework=QuartzCore");
        println!("cargo:rustc-link-lib=framework=Foundation");
    }

    // Ensure we rebuild if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
