/// Build metadata, fixed at compile time and only read by `--version`.
pub const PKG_VERSION: &str = clap::crate_version!();
pub const GIT_COMMIT: &str = git_version::git_version!(
    args = ["--always", "--dirty=-modified"],
    fallback = "unknown"
);

pub fn version_string() -> String {
    format!("v{} git={}", PKG_VERSION, GIT_COMMIT)
}
