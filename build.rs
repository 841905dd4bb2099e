// Exports build metadata reported by /api/v1/status and the app_info gauge.
//
// APP_VERSION lets CI stamp a release version (e.g. a git tag) without
// touching Cargo.toml; local builds fall back to the package version.
pub fn main() {
    println!("cargo:rerun-if-env-changed=APP_VERSION");

    let version = std::env::var("APP_VERSION")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "dev".into()));
    println!("cargo:rustc-env=BUILD_VERSION={version}");

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let rustc_version = std::process::Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=RUSTC_VERSION={rustc_version}");
}
