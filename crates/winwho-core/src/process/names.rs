//! Pid to short-command-name resolution via the OS process table.

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

use crate::process::types::Pid;

/// Maps a pid to the short command names it answers to.
///
/// A trait so the dispatcher can be exercised against a fake process table;
/// production code uses [`SysinfoNameLookup`].
pub trait ProcessNameLookup: Send {
    /// Short command name(s) for `pid`, or `None` if the process no longer
    /// exists. A vanished pid is an expected race (the window's owner can
    /// exit between focus detection and this lookup), never an error.
    fn names_for(&self, pid: Pid) -> Option<Vec<String>>;
}

/// Process-table lookup backed by sysinfo.
#[derive(Debug, Default)]
pub struct SysinfoNameLookup;

impl ProcessNameLookup for SysinfoNameLookup {
    fn names_for(&self, pid: Pid) -> Option<Vec<String>> {
        let mut system = System::new();
        let pid_obj = pid.to_sysinfo_pid();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

        match system.process(pid_obj) {
            Some(process) => {
                let name = process.name().to_string_lossy().to_string();
                Some(vec![name])
            }
            None => {
                debug!(
                    event = "core.process.pid_vanished",
                    pid = pid.as_u32(),
                    "Focused window's process exited before name lookup"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn test_names_for_vanished_pid() {
        // A pid known to be dead: our own child, already reaped. A magic
        // number could collide with a live process on hosts with a raised
        // pid_max.
        let mut child = Command::new("true")
            .stdout(Stdio::null())
            .spawn()
            .expect("Failed to spawn test process");
        let pid = child.id();
        child.wait().expect("child should exit");

        let lookup = SysinfoNameLookup;
        assert!(lookup.names_for(Pid::new(pid).unwrap()).is_none());
    }

    #[test]
    fn test_names_for_live_process() {
        let mut child = Command::new("sleep")
            .arg("10")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn test process");

        // spawn returns after fork; the child's comm still shows the parent
        // image until exec completes. Wait for exec before the lookup.
        for _ in 0..100 {
            let comm = std::fs::read_to_string(format!("/proc/{}/comm", child.id()));
            if comm.is_ok_and(|c| c.trim() == "sleep") {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let lookup = SysinfoNameLookup;
        let names = lookup
            .names_for(Pid::new(child.id()).unwrap())
            .expect("live process should resolve");
        assert_eq!(names.len(), 1);
        assert!(names[0].contains("sleep"));

        let _ = child.kill();
        let _ = child.wait();
    }
}
