//! Environment readiness check.

use std::path::{Path, PathBuf};

use trending_coins::renderer::chromium::{find_chromium, CHROMIUM_PATH_ENV};

/// Browser binary to use: an explicit path if it exists, else auto-detected.
pub fn locate_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(_) => None,
        None => find_chromium(),
    }
}

/// Print platform and browser availability. Returns whether live rendering can work.
pub fn run(explicit: Option<&Path>) -> bool {
    println!("trending-coins doctor");
    println!("=====================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium = locate_chromium(explicit);
    match (&chromium, explicit) {
        (Some(path), _) => println!("[OK] Chromium found: {}", path.display()),
        (None, Some(path)) => println!("[!!] Chromium not found at {}", path.display()),
        (None, None) => println!(
            "[!!] Chromium NOT found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}."
        ),
    }
    println!("[OK] Saved snapshots (--file) work without a browser");

    println!();
    let ready = chromium.is_some();
    if ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY (live --url rendering unavailable)");
    }
    ready
}
