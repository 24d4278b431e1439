use chrono::Utc;

fn main() {
    // WIFI_*, TELEMETRY_* and the optional host overrides can live in .env
    let _ = dotenv_build::output(dotenv_build::Config::default());

    let version = match std::env::var("BUILD_VERSION") {
        Ok(version) if !version.is_empty() => version,
        _ => format!("{}-{}", env!("CARGO_PKG_VERSION"), Utc::now().format("%Y%m%d%H%M")),
    };
    println!("cargo:rustc-env=BUILD_VERSION={version}");
    println!("cargo:rerun-if-env-changed=BUILD_VERSION");
    println!("cargo:rerun-if-changed=.env");
}
