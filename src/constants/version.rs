use semver::Version;

const UNVERSIONED_SHA: &str = "VERGEN_IDEMPOTENT_OUTPUT";

pub fn get_version() -> String {
    let semver = env!("CARGO_PKG_VERSION").parse::<Version>();

    match semver {
        // vergen falls back to this placeholder when the build runs outside a git checkout
        Ok(semver) if env!("VERGEN_GIT_SHA") == UNVERSIONED_SHA => semver.to_string(),
        Ok(semver) => format!("{} ({})", semver, env!("VERGEN_GIT_SHA")),
        Err(_) => {
            tracing::warn!("couldn't parse a semver out of Cargo.toml? defaulting to 0.0.0-unknown.");
            String::from("0.0.0-unknown")
        }
    }
}
