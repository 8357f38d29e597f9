//! The job manager: given a parsed [`Job`], decide whether it's a native
//! command, verify every program name resolves, and hand it off to the
//! launcher.

use std::collections::HashMap;

use crate::builtins::{self, NativeHandler};
use crate::filesystem;
use crate::jobs::BackgroundSlot;
use crate::launcher;
use crate::parser::Job;

pub struct Shell {
    pub cwd: String,
    pub background: BackgroundSlot,
    pub registry: HashMap<&'static str, NativeHandler>,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            cwd: filesystem::cwd(),
            background: BackgroundSlot::new(),
            registry: builtins::registry(),
        }
    }

    /// Run one parsed job to completion (or, for a background job, to
    /// launch), in this order:
    ///
    /// 1. A single-command job whose program name is in the
    ///    [`NativeRegistry`](builtins::registry) runs natively, in-process,
    ///    ignoring any `&` (native commands are never backgrounded).
    /// 2. Otherwise every stage's program name must `locate()` — the file
    ///    target of a `>` redirect is exempt, since it isn't a program.
    /// 3. A single external command goes through
    ///    [`launcher::spawn_foreground`]/[`launcher::spawn_background`]; two
    ///    or more stages go through [`launcher::run_pipeline`].
    pub fn run(&mut self, job: Job) {
        if job.cmds.len() == 1 {
            let name = job.cmds[0].argv[0].as_str();
            if let Some(handler) = self.registry.get(name).copied() {
                let args = job.cmds[0].argv[1..].to_vec();
                handler(self, &args);
                return;
            }
        }

        for cmd in &job.cmds {
            if cmd.is_last_of_pipeline {
                continue;
            }
            if filesystem::locate(&cmd.argv[0]).is_none() {
                eprintln!("unknown command: {}", cmd.argv[0]);
                return;
            }
        }

        if job.cmds.len() == 1 {
            let argv = &job.cmds[0].argv;
            let path = filesystem::locate(&argv[0]).expect("just verified above");
            let path = path.to_string_lossy().into_owned();
            if job.in_bg {
                launcher::spawn_background(&path, argv, self);
            } else {
                launcher::spawn_foreground(&path, argv, self);
            }
        } else {
            launcher::run_pipeline(&job.cmds, self);
        }
    }
}
