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

//! Interactive collection of registry credentials

use crate::domain::credentials::RegistryCredential;
use crate::infrastructure::constants::{URL_VALIDATION_REGEX, USERNAME_VALIDATION_REGEX};
use crate::shared::error::{InstallError, Result};
use regex::Regex;

/// Line-oriented user interaction.
pub trait Prompter: Send {
    /// Reads one line of visible input, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Reads one line without echoing it.
    fn read_password(&mut self, prompt: &str) -> Result<String>;

    fn say(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedInput {
    pub credential: RegistryCredential,
    pub repository: String,
}

pub struct InputCollector<'a> {
    prompter: &'a mut dyn Prompter,
    default_registry_url: String,
    repository: Option<String>,
    url_pattern: Regex,
    username_pattern: Regex,
}

impl<'a> InputCollector<'a> {
    /// `repository` falls back to the entered username when `None`.
    pub fn new(
        prompter: &'a mut dyn Prompter,
        default_registry_url: impl Into<String>,
        repository: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            prompter,
            default_registry_url: default_registry_url.into(),
            repository,
            url_pattern: compile(URL_VALIDATION_REGEX)?,
            username_pattern: compile(USERNAME_VALIDATION_REGEX)?,
        })
    }

    /// Prompts until the user confirms the entered values.
    pub fn collect(&mut self) -> Result<CollectedInput> {
        loop {
            let registry_url = read_input(
                &mut *self.prompter,
                "Enter Docker-Registry URL",
                Some(self.default_registry_url.as_str()),
                Some(&self.url_pattern),
            )?;
            let username = read_input(
                &mut *self.prompter,
                "Enter Username",
                None,
                Some(&self.username_pattern),
            )?;
            let password = read_password(&mut *self.prompter, "Enter Password")?;

            let repository = self.repository.clone().unwrap_or_else(|| username.clone());

            self.prompter.say("");
            self.prompter
                .say(&format!("Docker-Registry URL: {}", registry_url));
            self.prompter.say(&format!("Repository         : {}", repository));
            self.prompter.say(&format!("Username           : {}", username));

            let answer = self.prompter.read_line("Confirm configurations [Y/N]: ")?;
            if is_affirmative(&answer) {
                return Ok(CollectedInput {
                    credential: RegistryCredential::new(registry_url, username, password),
                    repository,
                });
            }
            tracing::debug!("configuration not confirmed, prompting again");
        }
    }
}

/// Checks credentials supplied without prompting against the same rules as the prompts.
pub fn validate_credential(credential: &RegistryCredential) -> Result<()> {
    if !compile(URL_VALIDATION_REGEX)?.is_match(&credential.registry_url) {
        return Err(InstallError::input(format!(
            "invalid Docker-Registry URL: '{}'",
            credential.registry_url
        )));
    }
    if !compile(USERNAME_VALIDATION_REGEX)?.is_match(&credential.username) {
        return Err(InstallError::input(format!(
            "invalid username: '{}'",
            credential.username
        )));
    }
    if credential.password.is_empty() {
        return Err(InstallError::input("password is required"));
    }
    Ok(())
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_uppercase().as_str(), "Y" | "YES")
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| InstallError::config_error(format!("invalid validation pattern: {}", e)))
}

/// Reads a required value, applying `default` to empty input and re-prompting
/// until the value matches `pattern`.
fn read_input(
    prompter: &mut dyn Prompter,
    label: &str,
    default: Option<&str>,
    pattern: Option<&Regex>,
) -> Result<String> {
    let prompt = match default {
        Some(value) if !value.is_empty() => format!("{} [{}]: ", label, value),
        _ => format!("{}: ", label),
    };

    loop {
        let line = prompter.read_line(&prompt)?;
        let value = match line.trim() {
            "" => default.unwrap_or_default().to_string(),
            entered => entered.to_string(),
        };

        if value.is_empty() {
            prompter.say(&format!("{} is required", label.trim_start_matches("Enter ")));
            continue;
        }
        if let Some(re) = pattern {
            if !re.is_match(&value) {
                prompter.say(&format!("Invalid input: '{}'", value));
                continue;
            }
        }
        return Ok(value);
    }
}

fn read_password(prompter: &mut dyn Prompter, label: &str) -> Result<String> {
    loop {
        let password = prompter.read_password(&format!("{}: ", label))?;
        if !password.is_empty() {
            return Ok(password);
        }
        prompter.say("Password is required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedPrompter {
        lines: VecDeque<String>,
        passwords: VecDeque<String>,
        output: Vec<String>,
        prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(lines: &[&str], passwords: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                passwords: passwords.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.prompts.push(prompt.to_string());
            self.lines
                .pop_front()
                .ok_or_else(|| InstallError::input("input stream closed"))
        }

        fn read_password(&mut self, prompt: &str) -> Result<String> {
            self.prompts.push(prompt.to_string());
            self.passwords
                .pop_front()
                .ok_or_else(|| InstallError::input("input stream closed"))
        }

        fn say(&mut self, message: &str) {
            self.output.push(message.to_string());
        }
    }

    fn collect(prompter: &mut ScriptedPrompter, repository: Option<&str>) -> Result<CollectedInput> {
        InputCollector::new(
            prompter,
            "https://index.docker.io/v1/",
            repository.map(str::to_string),
        )?
        .collect()
    }

    #[test]
    fn test_collect_confirmed_first_time() {
        let mut prompter = ScriptedPrompter::new(&["docker.io", "alice", "y"], &["secret"]);
        let input = collect(&mut prompter, Some("acme")).unwrap();

        assert_eq!(
            input.credential,
            RegistryCredential::new("docker.io", "alice", "secret")
        );
        assert_eq!(input.repository, "acme");
    }

    #[test]
    fn test_default_registry_url_on_empty_input() {
        let mut prompter = ScriptedPrompter::new(&["", "alice", "YES"], &["secret"]);
        let input = collect(&mut prompter, None).unwrap();

        assert_eq!(input.credential.registry_url, "https://index.docker.io/v1/");
        assert_eq!(input.repository, "alice");
        assert_eq!(
            prompter.prompts[0],
            "Enter Docker-Registry URL [https://index.docker.io/v1/]: "
        );
    }

    #[test]
    fn test_affirmative_answers() {
        for answer in ["Y", "y", "YES", "yes", "Yes", " y "] {
            assert!(is_affirmative(answer), "{answer:?} should confirm");
        }
        for answer in ["", "n", "no", "yep", "ye", "1", "true"] {
            assert!(!is_affirmative(answer), "{answer:?} should not confirm");
        }
    }

    #[test]
    fn test_rejection_restarts_whole_sequence() {
        let mut prompter = ScriptedPrompter::new(
            &[
                "docker.io", "alice", "n", // rejected
                "quay.io", "bob", "", // empty answer also re-prompts
                "ghcr.io", "carol", "yes",
            ],
            &["one", "two", "three"],
        );
        let input = collect(&mut prompter, Some("acme")).unwrap();

        assert_eq!(
            input.credential,
            RegistryCredential::new("ghcr.io", "carol", "three")
        );
        let url_prompts = prompter
            .prompts
            .iter()
            .filter(|p| p.starts_with("Enter Docker-Registry URL"))
            .count();
        assert_eq!(url_prompts, 3);
    }

    #[test]
    fn test_never_accepts_without_confirmation() {
        let mut prompter = ScriptedPrompter::new(&["docker.io", "alice", "nope"], &["secret"]);
        let err = collect(&mut prompter, None).unwrap_err();
        assert!(matches!(err, InstallError::Input(_)));
    }

    #[test]
    fn test_invalid_values_reprompt_field() {
        let mut prompter = ScriptedPrompter::new(
            &["not a url", "docker.io", "", "bad name!", "alice", "Y"],
            &["", "secret"],
        );
        let input = collect(&mut prompter, None).unwrap();

        assert_eq!(
            input.credential,
            RegistryCredential::new("docker.io", "alice", "secret")
        );
        assert!(prompter.output.iter().any(|l| l == "Username is required"));
        assert!(prompter.output.iter().any(|l| l == "Password is required"));
        assert!(prompter.output.iter().any(|l| l.contains("not a url")));
    }

    #[test]
    fn test_summary_never_shows_password() {
        let mut prompter = ScriptedPrompter::new(&["docker.io", "alice", "y"], &["s3cr3t-value"]);
        collect(&mut prompter, Some("acme")).unwrap();

        assert!(prompter
            .output
            .iter()
            .any(|l| l == "Docker-Registry URL: docker.io"));
        assert!(prompter.output.iter().any(|l| l == "Repository         : acme"));
        assert!(prompter.output.iter().any(|l| l == "Username           : alice"));
        assert!(!prompter.output.iter().any(|l| l.contains("s3cr3t-value")));
    }

    #[test]
    fn test_validate_credential() {
        assert!(validate_credential(&RegistryCredential::new("docker.io", "alice", "secret")).is_ok());
        assert!(validate_credential(&RegistryCredential::new("not a url", "alice", "secret")).is_err());
        assert!(validate_credential(&RegistryCredential::new("docker.io", "bad name", "secret")).is_err());
        assert!(validate_credential(&RegistryCredential::new("docker.io", "alice", "")).is_err());
    }

    #[test]
    fn test_url_pattern() {
        let re = compile(URL_VALIDATION_REGEX).unwrap();
        for ok in [
            "docker.io",
            "https://index.docker.io/v1/",
            "localhost:5000",
            "http://registry.local:5000/v2/",
            "gcr.io",
        ] {
            assert!(re.is_match(ok), "{ok} should be accepted");
        }
        for bad in ["", "not a url", "ftp://x.io", "docker.io/ space"] {
            assert!(!re.is_match(bad), "{bad} should be rejected");
        }
    }
}
