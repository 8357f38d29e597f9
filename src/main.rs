//! The REPL driver: print a prompt, read a line, parse it, dispatch it.

mod builtins;
mod filesystem;
mod job_control;
mod jobs;
mod launcher;
mod parser;
mod shell;
mod status;
mod tokenizer;

use std::io::{self, BufRead, Write};

use shell::Shell;

fn main() {
    job_control::install_shell_signal_dispositions();
    filesystem::cd_to_home();

    let mut shell = Shell::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("[{}]$ ", shell.cwd);
        if io::stdout().flush().is_err() {
            std::process::exit(0);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) | None => std::process::exit(0),
        };

        let tokens = tokenizer::tokenize(&line);
        match parser::parse_job(tokens) {
            Ok(Some(job)) => shell.run(job),
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }
}
