#![allow(clippy::doc_markdown)] // Generated file contains OPT_LEVEL without backticks

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// The vcfsplit version logged at startup: `<pkg>-<commit>[-dirty]`, or just the package
/// version when built outside a git checkout (e.g. from a crates.io tarball).
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let mut version = PKG_VERSION.to_string();
    if let Some(hash) = GIT_COMMIT_HASH_SHORT.or(GIT_COMMIT_HASH) {
        version.push('-');
        version.push_str(hash);
    }
    if GIT_DIRTY == Some(true) {
        version.push_str("-dirty");
    }
    version
});
