//! Test driver for command-line integration tests.
//!
//! Runs a binary with the given arguments and environment, with stdin
//! closed, and captures its exit code, stdout and stderr for assertions.

use std::ffi::OsString;
use std::process::{Command, Stdio};

/// One invocation of the binary under test.
pub struct TestSession {
    binary: String,
    args: Vec<OsString>,
    env: Vec<(String, String)>,
    /// Variables removed from the inherited environment.
    env_remove: Vec<String>,
}

impl TestSession {
    /// `binary` is the path to the program, usually `env!("CARGO_BIN_EXE_<name>")`.
    pub fn new(binary: &str) -> TestSession {
        TestSession {
            binary: binary.to_string(),
            args: Vec::new(),
            env: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn env_remove(mut self, key: &str) -> Self {
        self.env_remove.push(key.to_string());
        self
    }

    /// Run to completion and return whatever it produced.
    pub fn run(&self) -> std::io::Result<SessionOutput> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        for key in &self.env_remove {
            cmd.env_remove(key);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::null());

        let output = cmd.output()?;
        Ok(SessionOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run and assert the exit code.
    pub fn wait_exit(&self, expected_code: i32) -> SessionOutput {
        let output = self
            .run()
            .unwrap_or_else(|e| panic!("failed to run {}: {e}", self.binary));
        let SessionOutput {
            code,
            stdout,
            stderr,
        } = &output;

        assert_eq!(
            *code, expected_code,
            "expected exit code {expected_code}, got {code}\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );
        output
    }
}

/// Output captured from a completed session.
#[derive(Debug)]
pub struct SessionOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}
