// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! External process invocation

use crate::shared::error::{InstallError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
    /// Human readable message reported when the call fails
    pub context: String,
}

impl Invocation {
    pub fn new(program: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            context: context.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait::async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation to completion and returns its captured stdout.
    async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        tracing::debug!(command = %invocation.command_line(), "running external command");

        let launch_error = |source: std::io::Error| InstallError::ProcessLaunch {
            context: invocation.context.clone(),
            program: invocation.program.clone(),
            source,
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(launch_error)?;

        if let Some(input) = &invocation.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // a child that exits before reading all of stdin closes the pipe;
                // its exit status and stderr are reported below instead
                match pipe.write_all(input).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        tracing::debug!(program = %invocation.program, "stdin closed early by child");
                    }
                    Err(e) => return Err(launch_error(e)),
                }
                // dropping the pipe closes the child's stdin
            }
        }

        let output = child.wait_with_output().await.map_err(launch_error)?;

        if !output.status.success() {
            return Err(InstallError::ProcessExit {
                context: invocation.context.clone(),
                program: invocation.program.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
