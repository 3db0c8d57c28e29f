//! Version command implementation

use crate::config::TuxSyncConfig;
use crate::error::Result;

/// Print the version and where backups and the installer come from
pub fn run(config: &TuxSyncConfig) -> Result<()> {
    println!("tuxsync {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Sources:");
    println!("  Restore script: {}", config.restore_script_url());
    println!("  Installer release: {}", config.tuxmate_release_url());
    println!();
    println!("Build: {} on {}", build_profile(), std::env::consts::OS);

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
