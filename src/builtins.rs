//! Native command handlers, run in-process instead of forked.
//!
//! A native handler takes `(&mut Shell, argv)` rather than capturing the
//! shell by closure: that keeps the registry a plain `HashMap` of function
//! pointers with no borrow-checker fights over who owns the shell's mutable
//! state.

use std::collections::HashMap;

use crate::filesystem;
use crate::launcher;
use crate::shell::Shell;

pub type NativeHandler = fn(&mut Shell, &[String]);

/// The fixed set of native command names, built once at startup.
pub fn registry() -> HashMap<&'static str, NativeHandler> {
    let mut reg: HashMap<&'static str, NativeHandler> = HashMap::new();
    reg.insert("exit", native_exit);
    reg.insert("pwd", native_pwd);
    reg.insert("cd", native_cd);
    reg.insert("fg", native_fg);
    reg.insert("test", native_test);
    reg.insert("testbg", native_testbg);
    reg
}

fn native_exit(_shell: &mut Shell, _args: &[String]) {
    std::process::exit(0);
}

fn native_pwd(shell: &mut Shell, _args: &[String]) {
    println!("{}", shell.cwd);
}

fn native_cd(shell: &mut Shell, args: &[String]) {
    let Some(path) = args.first() else {
        eprintln!("cd: missing path to change directory");
        return;
    };
    if args.len() > 1 {
        eprintln!("cd: too many arguments");
        return;
    }
    match filesystem::cd(path) {
        Ok(()) => shell.cwd = filesystem::cwd(),
        Err(e) => eprintln!("{e}"),
    }
}

fn native_fg(shell: &mut Shell, _args: &[String]) {
    launcher::bring_to_foreground(shell);
}

/// Diagnostic fixture: launch a foreground `sleep 30` to exercise Ctrl-Z /
/// `fg` manually, matching `job.hpp`'s `test` entry.
fn native_test(shell: &mut Shell, _args: &[String]) {
    println!("launching sleep");
    launcher::spawn_foreground("/bin/sleep", &["sleep".to_string(), "30".to_string()], shell);
}

/// Diagnostic fixture: launch `sleep 20` directly in the background,
/// matching `job.hpp`'s `testbg` entry.
fn native_testbg(shell: &mut Shell, _args: &[String]) {
    println!("launching sleep in bg. Enter fg to bring to foreground.");
    launcher::spawn_background("/bin/sleep", &["sleep".to_string(), "20".to_string()], shell);
}
