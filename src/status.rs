use std::io;

/// Convert a reaped child's `ExitStatus` into the shell's exit-code convention.
///
/// Processes terminated by a signal map to `128 + signal`, matching the
/// `WIFSIGNALED`/`WTERMSIG` handling the launcher otherwise leaves undone.
pub fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Decode a raw `waitpid` status into exit code, signalled, or stopped.
#[cfg(unix)]
pub enum RawWaitStatus {
    Exited(i32),
    Stopped,
}

#[cfg(unix)]
pub fn decode_wait_status(raw: libc::c_int) -> Option<RawWaitStatus> {
    if unsafe { libc::WIFSTOPPED(raw) } {
        return Some(RawWaitStatus::Stopped);
    }
    if unsafe { libc::WIFEXITED(raw) } {
        return Some(RawWaitStatus::Exited(unsafe { libc::WEXITSTATUS(raw) }));
    }
    if unsafe { libc::WIFSIGNALED(raw) } {
        let signal = unsafe { libc::WTERMSIG(raw) };
        return Some(RawWaitStatus::Exited(128 + signal));
    }
    None
}

/// An unrecoverable kernel-call failure. Prints a `CRASH!` diagnostic
/// naming the syscall and terminates the process with status 1 — mirrors
/// `process.hpp`'s `cerr << "CRASH! ..."; exit(1);` at every
/// `fork`/`pipe`/`waitpid`/`tcsetpgrp`/`close` call site.
pub fn crash(syscall: &str, err: &io::Error) -> ! {
    eprintln!("CRASH! {syscall}() failed: {err}");
    std::process::exit(1);
}

/// Like [`crash`] but for failures with no underlying `io::Error` (e.g. a
/// missing `HOME` environment variable).
pub fn crash_msg(what: &str) -> ! {
    eprintln!("CRASH! {what}");
    std::process::exit(1);
}
