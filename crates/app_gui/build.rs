use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SCENE_SPOTTER_VERSION");
    let version = env::var("SCENE_SPOTTER_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=SCENE_SPOTTER_VERSION={version}");
}
