//! Lock file management for single-instance enforcement.
//!
//! The daemon holds an exclusive `fs2` lock on `$XDG_RUNTIME_DIR/themeflux.lock`
//! for its whole lifetime. The file records the PID and the configuration
//! directory so that `themeflux reload` and `themeflux stop` can find the
//! running instance. The kernel drops the lock when the process dies, so a
//! leftover file from a crash never blocks a new start.

use anyhow::{Context, Result};
use fs2::FileExt;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::common::constants::LOCK_FILE_NAME;
use crate::config;

/// Default location of the lock file.
pub fn lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join(LOCK_FILE_NAME)
}

/// An acquired instance lock. Released on [`InstanceLock::release`] or drop.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unlock and remove the lock file.
    pub fn release(self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Result of trying to become the running instance.
#[derive(Debug)]
pub enum LockStatus {
    Acquired(InstanceLock),
    /// Another process holds the lock; its PID if the file could be read
    HeldBy(Option<u32>),
}

/// Try to take the instance lock at `path` without blocking.
pub fn acquire_lock(path: &Path) -> Result<LockStatus> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Don't truncate: the current holder's PID must stay readable
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))?;

    if file.try_lock_exclusive().is_err() {
        return Ok(LockStatus::HeldBy(read_pid(path)));
    }

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    match config::get_custom_config_dir() {
        Some(dir) => writeln!(file, "{}", dir.display())?,
        None => writeln!(file)?,
    }
    file.flush()?;

    Ok(LockStatus::Acquired(InstanceLock {
        file,
        path: path.to_path_buf(),
    }))
}

/// PID of the process holding the lock at `path`, if one is running.
pub fn running_instance(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    if file.try_lock_exclusive().is_ok() {
        // Nobody holds it
        let _ = FileExt::unlock(&file);
        return None;
    }
    read_pid(path).filter(|&pid| is_process_running(pid))
}

fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()?
        .lines()
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Whether a process with `pid` exists.
pub fn is_process_running(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    // Signal 0 only checks for existence; EPERM still means it exists
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}
