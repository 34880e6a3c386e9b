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

//! Terminal-backed prompter

use crate::domain::input::Prompter;
use crate::shared::error::{InstallError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead, IsTerminal, Write};

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        show_prompt(prompt)?;
        read_stdin_line()
    }

    fn read_password(&mut self, prompt: &str) -> Result<String> {
        show_prompt(prompt)?;
        if !io::stdin().is_terminal() {
            return read_stdin_line();
        }

        let password = {
            let _raw = RawModeGuard::enable()?;
            read_hidden_keys()
        };
        println!();
        password.map_err(|e| InstallError::input(format!("failed to read password: {}", e)))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

fn show_prompt(prompt: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| InstallError::input(format!("failed to read input: {}", e)))?;
    if read == 0 {
        return Err(InstallError::input("input stream closed"));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_hidden_keys() -> io::Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            match code {
                KeyCode::Enter => return Ok(password),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            }
        }
    }
}
