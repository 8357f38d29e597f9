//! Home directory, cwd, and `PATH` search.

use std::env;
use std::path::PathBuf;

use crate::status;

/// Current working directory as a display string.
///
/// Only called after a successful `cd`/`cd_to_home`, so a failure here
/// means the process's cwd has become unreadable out from under it — an
/// unrecoverable condition.
pub fn cwd() -> String {
    match env::current_dir() {
        Ok(path) => path.display().to_string(),
        Err(e) => status::crash("getcwd", &e),
    }
}

/// Change the cwd to `$HOME`. Fatal if `HOME` is unset, matching the
/// original `myfilesystem.hpp::get_home`.
pub fn cd_to_home() {
    let home = match env::var("HOME") {
        Ok(home) => home,
        Err(_) => status::crash_msg("couldn't determine HOME directory"),
    };
    if let Err(e) = env::set_current_dir(&home) {
        status::crash("chdir", &e);
    }
}

/// Change the cwd to `path`. Failures are surfaced to the caller, never
/// fatal, and leave the cwd unchanged.
pub fn cd(path: &str) -> Result<(), String> {
    env::set_current_dir(path).map_err(|e| format!("cd: {path}: {e}"))
}

/// Search `.` followed by the colon-separated entries of `PATH` for the
/// first `dir/name` that is a regular file with the owner-execute bit set.
/// Symlinks are followed implicitly by `stat` (`std::fs::metadata`).
///
/// `.` is always searched first, even when `PATH` is unset or empty,
/// matching `myfilesystem.hpp::get_path_dirs` seeding its directory list
/// with `"."` unconditionally.
pub fn locate(name: &str) -> Option<PathBuf> {
    let path_var = env::var("PATH").unwrap_or_default();

    std::iter::once(".".to_string())
        .chain(path_var.split(':').filter(|entry| !entry.is_empty()).map(str::to_string))
        .map(|dir| PathBuf::from(dir).join(name))
        .find(|candidate| is_owner_executable(candidate))
}

fn is_owner_executable(path: &std::path::Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & libc::S_IXUSR as u32 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn locate_finds_executable_in_dot() {
        let dir = std::env::temp_dir().join(format!("ushell_locate_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let bin = dir.join("my-tool");
        fs::write(&bin, "#!/bin/sh\necho hi\n").unwrap();
        #[cfg(unix)]
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        let saved = std::env::current_dir().unwrap();
        std::env::set_current_dir(&dir).unwrap();
        let found = locate("my-tool");
        std::env::set_current_dir(saved).unwrap();

        fs::remove_dir_all(&dir).ok();
        assert!(found.is_some());
    }

    #[test]
    fn locate_missing_returns_none() {
        assert!(locate("definitely-not-a-real-command-xyz").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn locate_rejects_non_executable_file() {
        let dir = std::env::temp_dir().join(format!("ushell_locate_noexec_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("data.txt");
        fs::write(&file, "not executable").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let saved = std::env::current_dir().unwrap();
        std::env::set_current_dir(&dir).unwrap();
        let found = locate("data.txt");
        std::env::set_current_dir(saved).unwrap();

        fs::remove_dir_all(&dir).ok();
        assert!(found.is_none());
    }
}
