use std::{
    fs::File,
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;

/// A bot process whose standard streams are redirected to files.
///
/// The child is killed on drop if it has not exited or been killed already.
#[derive(Debug)]
pub struct AgentProcess {
    child: Child,
    cleaned_up: bool,
}

impl AgentProcess {
    /// Equivalent of `command args < stdin > stdout`, without going through a shell.
    pub fn launch(
        command: &Path,
        args: &[String],
        stdin: File,
        stdout: File,
        allow_stderr: bool,
    ) -> std::io::Result<AgentProcess> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout));
        if !allow_stderr {
            cmd.stderr(Stdio::null());
        }
        let child = cmd.spawn()?;
        Ok(AgentProcess {
            child,
            cleaned_up: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Waits for the process to exit.
    ///
    /// Returns `Ok(None)` when `timeout` elapsed first; the process is still running then.
    pub fn wait_timeout(
        &mut self,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Option<ExitStatus>> {
        let Some(timeout) = timeout else {
            let status = self.child.wait().context("failed to wait for agent process")?;
            self.cleaned_up = true;
            return Ok(Some(status));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self
                .child
                .try_wait()
                .context("failed to poll agent process")?
            {
                self.cleaned_up = true;
                return Ok(Some(status));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            // at least 10 polls per timeout
            thread::sleep(Duration::from_millis(5).min(timeout / 10).min(deadline - now));
        }
    }

    pub fn try_kill(&mut self) -> anyhow::Result<()> {
        match self.child.kill() {
            Ok(()) => {}
            // already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => return Err(e).context("could not kill process"),
        }
        self.child.wait().context("could not reap killed process")?;
        self.cleaned_up = true;
        Ok(())
    }
}

impl Drop for AgentProcess {
    fn drop(&mut self) {
        if !self.cleaned_up {
            if let Err(e) = self.try_kill() {
                tracing::error!("could not kill agent process {} on drop: {e}", self.child.id());
            }
        }
    }
}
