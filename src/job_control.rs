//! Process-group and terminal plumbing for job control.
//!
//! Unix-only: `setpgid`/`tcsetpgrp`/`waitpid` have no portable equivalent.

use std::io;

use crate::status::{self, RawWaitStatus};

/// Install the shell's own signal dispositions, once, before the REPL
/// starts. Keyboard-generated SIGINT/SIGTSTP must never reach the shell
/// itself — only the foreground job's process group, which `tcsetpgrp`
/// always points at a child, never the shell. SIGTTOU and SIGTTIN are
/// ignored so the shell can call `tcsetpgrp` on itself without being
/// stopped for doing so while backgrounded by its own reparenting.
pub fn install_shell_signal_dispositions() {
    for sig in [libc::SIGINT, libc::SIGTSTP, libc::SIGTTOU, libc::SIGTTIN] {
        unsafe {
            libc::signal(sig, libc::SIG_IGN);
        }
    }
}

/// Reset the two dispositions the shell ignores back to default in a
/// forked child, before `execve`. `SIG_IGN` survives `exec`, so without
/// this a child would also ignore Ctrl-Z and Ctrl-C.
pub fn reset_child_signal_dispositions() {
    for sig in [libc::SIGINT, libc::SIGTSTP] {
        unsafe {
            libc::signal(sig, libc::SIG_DFL);
        }
    }
}

/// `setpgid`, retried across `EINTR`. `EACCES`/`ESRCH` (the child already
/// exec'd or already exited) are treated as success — best-effort, as in
/// the original `process.hpp::set_process_grp_to_fg` callers.
pub fn set_process_group(pid: libc::pid_t, pgid: libc::pid_t) -> io::Result<()> {
    loop {
        if unsafe { libc::setpgid(pid, pgid) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::EACCES) | Some(libc::ESRCH) => return Ok(()),
            _ => return Err(err),
        }
    }
}

/// Send `SIGCONT` to an entire process group (used to resume a stopped
/// job brought back to the foreground).
pub fn send_continue_to_group(pgid: libc::pid_t) -> io::Result<()> {
    loop {
        if unsafe { libc::kill(-pgid, libc::SIGCONT) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err);
    }
}

/// RAII guard: transfers the controlling terminal to `target_pgid` on
/// construction, and back to the shell's own process group on drop.
/// Expressed as scope exit so every launcher path reclaims the terminal
/// exactly once, even on early return.
///
/// A no-op when stdin isn't a tty (e.g. under a test harness or a pipe) —
/// there's no controlling terminal to hand off.
pub struct ForegroundTerminalGuard {
    is_tty: bool,
    shell_pgid: libc::pid_t,
}

impl ForegroundTerminalGuard {
    pub fn new(target_pgid: libc::pid_t) -> io::Result<Self> {
        let is_tty = unsafe { libc::isatty(libc::STDIN_FILENO) } == 1;
        let shell_pgid = unsafe { libc::getpgrp() };
        if is_tty {
            set_terminal_foreground(target_pgid)?;
        }
        Ok(Self { is_tty, shell_pgid })
    }
}

impl Drop for ForegroundTerminalGuard {
    fn drop(&mut self) {
        if self.is_tty {
            let _ = set_terminal_foreground(self.shell_pgid);
        }
    }
}

fn set_terminal_foreground(pgid: libc::pid_t) -> io::Result<()> {
    // SIGTTOU is already SIG_IGN for the whole shell process
    // (install_shell_signal_dispositions), so tcsetpgrp never stops us here.
    loop {
        if unsafe { libc::tcsetpgrp(libc::STDIN_FILENO, pgid) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        return Err(err);
    }
}

pub enum WaitOutcome {
    Exited(i32),
    Stopped,
}

/// `waitpid(pid, &status, WUNTRACED)`, retried across `EINTR`.
/// `WUNTRACED` is what lets a Ctrl-Z on the foreground child return
/// instead of blocking until it exits.
pub fn wait_for_pid(pid: libc::pid_t) -> io::Result<WaitOutcome> {
    let mut raw: libc::c_int = 0;
    loop {
        let rc = unsafe { libc::waitpid(pid, &mut raw, libc::WUNTRACED) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            return Err(err);
        }
        match status::decode_wait_status(raw) {
            Some(RawWaitStatus::Stopped) => return Ok(WaitOutcome::Stopped),
            Some(RawWaitStatus::Exited(code)) => return Ok(WaitOutcome::Exited(code)),
            None => continue, // e.g. a transient continue notification
        }
    }
}
