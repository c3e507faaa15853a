// Embeds the build time into `--version`

fn main() {
    let built = chrono::Local::now().format("%Y-%m-%d %H:%M %Z");
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", built);
    // No rerun-if-changed: the timestamp is refreshed on every build
}
