//! The process launcher: foreground single command, background single
//! command, pipeline, and bringing a background job back to the
//! foreground.

use std::io::{Read, Write};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use os_pipe::{pipe, PipeReader};

use crate::filesystem;
use crate::job_control::{self, ForegroundTerminalGuard, WaitOutcome};
use crate::parser;
use crate::shell::Shell;
use crate::status;

/// Build a `std::process::Command` with the common child-side setup:
/// `argv[0]` is the user-typed program name (not `path`), the environment
/// is cleared (children exec with a null environment), and `pre_exec`
/// resets SIGINT/SIGTSTP to default and joins the right process group
/// before `execve` actually runs.
///
/// `join_pgid` is `None` for a new process-group leader (first stage of a
/// pipeline, or any standalone command) and `Some(leader_pgid)` for a
/// pipeline stage joining an already-established group.
fn build_command(path: &Path, argv: &[String], join_pgid: Option<libc::pid_t>) -> Command {
    let mut command = Command::new(path);
    command.args(&argv[1..]);
    command.arg0(&argv[0]);
    command.env_clear();

    unsafe {
        command.pre_exec(move || {
            job_control::reset_child_signal_dispositions();
            let target = join_pgid.unwrap_or(0);
            if libc::setpgid(0, target) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    command
}

fn spawn(mut command: Command) -> Child {
    match command.spawn() {
        Ok(child) => child,
        Err(e) => status::crash("execve", &e),
    }
}

/// Launch a single command in the foreground, transferring the terminal
/// to it for the duration. Returns the child's exit code.
pub fn spawn_foreground(path: &str, argv: &[String], shell: &mut Shell) -> i32 {
    let child = spawn(build_command(Path::new(path), argv, None));
    let pid = child.id() as libc::pid_t;
    let _ = job_control::set_process_group(pid, pid);

    let guard = match ForegroundTerminalGuard::new(pid) {
        Ok(guard) => guard,
        Err(e) => status::crash("tcsetpgrp", &e),
    };
    let outcome = match job_control::wait_for_pid(pid) {
        Ok(outcome) => outcome,
        Err(e) => status::crash("waitpid", &e),
    };
    drop(guard);

    match outcome {
        WaitOutcome::Stopped => {
            shell.background.set(child, pid);
            println!("suspended; resume with fg");
            0
        }
        WaitOutcome::Exited(code) => {
            // Mirrors process.hpp::spawn(): any foreground command reaching
            // a normal exit clears the background slot, even one unrelated
            // to whatever job is currently held there.
            shell.background.clear();
            code
        }
    }
}

/// Launch a single command in the background. Does not wait; hands the
/// child straight to the [`crate::jobs::BackgroundSlot`].
pub fn spawn_background(path: &str, argv: &[String], shell: &mut Shell) {
    let child = spawn(build_command(Path::new(path), argv, None));
    let pid = child.id() as libc::pid_t;
    let _ = job_control::set_process_group(pid, pid);
    shell.background.set(child, pid);
    println!("launched in the background");
}

/// Bring the held background/stopped job back to the foreground and
/// resume it. No-op if the background slot is empty.
pub fn bring_to_foreground(shell: &mut Shell) {
    let Some(job) = shell.background.take() else {
        return;
    };
    let child = job.child;
    let pgid = job.pgid;

    let guard = match ForegroundTerminalGuard::new(pgid) {
        Ok(guard) => guard,
        Err(e) => status::crash("tcsetpgrp", &e),
    };
    if let Err(e) = job_control::send_continue_to_group(pgid) {
        status::crash("kill", &e);
    }

    let outcome = match job_control::wait_for_pid(child.id() as libc::pid_t) {
        Ok(outcome) => outcome,
        Err(e) => status::crash("waitpid", &e),
    };
    drop(guard);

    match outcome {
        WaitOutcome::Stopped => {
            shell.background.set(child, pgid);
            println!("suspended; resume with fg");
        }
        WaitOutcome::Exited(_) => {
            shell.background.clear();
        }
    }
}

/// Launch a pipeline of two or more stages, optionally tailed by a
/// write-to-file target. Prints `pipeline failed!` to stderr if any
/// process stage exits non-zero.
///
/// Pipes are created just-in-time, one per producing stage, rather than
/// all `n-1` up front — functionally identical to pre-allocating them,
/// since each is consumed by exactly the stage that creates it and the
/// very next stage, and it keeps ownership of each `PipeReader`/
/// `PipeWriter` tied to the `Stdio` that closes it.
pub fn run_pipeline(cmds: &[parser::Command], shell: &mut Shell) {
    let _ = shell; // pipelines don't touch cwd or the background slot

    let mut children: Vec<Child> = Vec::new();
    let mut pipeline_pgid: Option<libc::pid_t> = None;
    let mut prev_reader: Option<PipeReader> = None;
    let mut pipeline_failed = false;

    for cmd in cmds {
        if cmd.is_last_of_pipeline {
            let reader = prev_reader
                .take()
                .expect("is_last_of_pipeline implies in_redirect, so a pipe always precedes it");
            if let Err(e) = drain_pipe_to_file(reader, &cmd.argv[0]) {
                eprintln!("{}: {e}", cmd.argv[0]);
                pipeline_failed = true;
            }
            break;
        }

        let (stdout_stdio, next_reader) = if cmd.out_redirect {
            match pipe() {
                Ok((reader, writer)) => (Stdio::from(writer), Some(reader)),
                Err(e) => status::crash("pipe", &e),
            }
        } else {
            (Stdio::inherit(), None)
        };
        let stdin_stdio = match prev_reader.take() {
            Some(reader) => Stdio::from(reader),
            None => Stdio::inherit(),
        };

        // The job manager's verify step already rejected any unresolvable
        // non-tail stage before we get here; this is defensive.
        let Some(path) = filesystem::locate(&cmd.argv[0]) else {
            eprintln!("unknown command: {}", cmd.argv[0]);
            reap_remaining(&mut children);
            return;
        };

        let mut command = build_command(&path, &cmd.argv, pipeline_pgid);
        command.stdin(stdin_stdio).stdout(stdout_stdio);
        let child = spawn(command);

        if pipeline_pgid.is_none() {
            let pid = child.id() as libc::pid_t;
            let _ = job_control::set_process_group(pid, pid);
            pipeline_pgid = Some(pid);
        }

        children.push(child);
        prev_reader = next_reader;
    }

    let Some(fg_pgid) = pipeline_pgid else {
        return;
    };

    let guard = match ForegroundTerminalGuard::new(fg_pgid) {
        Ok(guard) => guard,
        Err(e) => status::crash("tcsetpgrp", &e),
    };

    // Plain waitpid(pid, &status, 0) per stage — no WUNTRACED. A pipeline
    // being stopped mid-flight is not a case this design handles specially;
    // terminal ownership is left alone between waits and reclaimed once
    // at the end.
    for child in &mut children {
        match child.wait() {
            Ok(status) if status::exit_code(status) != 0 => pipeline_failed = true,
            Ok(_) => {}
            Err(e) => status::crash("waitpid", &e),
        }
    }
    drop(guard);

    if pipeline_failed {
        eprintln!("pipeline failed!");
    }
}

fn reap_remaining(children: &mut [Child]) {
    for child in children.iter_mut() {
        let _ = child.wait();
    }
}

fn drain_pipe_to_file(mut reader: PipeReader, path: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let mut buf = [0u8; 1280];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
    }
    Ok(())
}
