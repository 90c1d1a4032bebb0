//! Isolated runtime construction.
//!
//! Two blocking invocations, in order: `<python> -m venv <app>/venv`, then
//! `<app>/venv/bin/pip install <deps>`. Either failing is fatal to the build;
//! nothing is retried.

use crate::wrapper::{
    error::{Error, ProcessFailure, Result, RuntimeStep},
    model::AppLayout,
    settings::Settings,
    utils::process::{ProcessRunner, describe},
};
use std::process::Command;

/// Builds the private interpreter tree of one app.
pub struct RuntimeBuilder<'a> {
    settings: &'a Settings,
    runner: &'a dyn ProcessRunner,
}

impl<'a> RuntimeBuilder<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn ProcessRunner) -> Self {
        Self { settings, runner }
    }

    /// Creates `<app>/venv`.
    pub fn create_environment(&self, layout: &AppLayout) -> Result<()> {
        let mut command = Command::new(self.settings.python());
        command
            .arg("-m")
            .arg("venv")
            .arg(layout.runtime_dir());
        self.run(RuntimeStep::CreateEnvironment, command)
    }

    /// Installs the configured dependency set with the runtime's own pip.
    pub fn install_dependencies(&self, layout: &AppLayout) -> Result<()> {
        let mut command = Command::new(layout.pip());
        command.arg("install").args(self.settings.dependencies());
        self.run(RuntimeStep::InstallDependencies, command)
    }

    fn run(&self, step: RuntimeStep, mut command: Command) -> Result<()> {
        let line = describe(&command);
        log::debug!("Running {}: {}", step, line);

        let output = self
            .runner
            .run(&mut command, self.settings.process_timeout())
            .map_err(|e| {
                Error::RuntimeBuild(Box::new(ProcessFailure {
                    step,
                    command: line.clone(),
                    status: None,
                    stdout: String::new(),
                    stderr: format!("failed to start: {e}"),
                }))
            })?;

        if output.success {
            log::debug!("{} finished", step);
            return Ok(());
        }

        if output.timed_out {
            log::warn!("{} timed out: {}", step, line);
        }
        Err(Error::RuntimeBuild(Box::new(ProcessFailure {
            step,
            command: line,
            status: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })))
    }
}
