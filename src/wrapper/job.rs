//! Background provisioning jobs.
//!
//! A [`ProvisionJob`] runs one [`Provisioner`] on tokio's blocking pool and
//! streams its progress back over a single ordered channel: zero or more
//! [`JobEvent::Progress`] followed by exactly one terminal event. The
//! provisioner itself stays a plain blocking procedure.

use crate::wrapper::{
    builder::{Provisioner, Stage},
    error::{Error, Result},
    model::{AppRecord, AppSpec},
    settings::Settings,
    utils::process::ProcessRunner,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::mpsc;

/// Notification delivered from a running job.
#[derive(Debug)]
pub enum JobEvent {
    Progress(Stage),
    Succeeded(AppRecord),
    Failed(Error),
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

/// Submission refused by a [`JobRunner`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobError {
    #[error("a provisioning job is already running")]
    Busy,
}

/// Handle to one in-flight provisioning run.
#[derive(Debug)]
pub struct ProvisionJob {
    events: mpsc::UnboundedReceiver<JobEvent>,
    done: bool,
}

impl ProvisionJob {
    /// Starts provisioning `spec` on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(settings: Settings, runner: Arc<dyn ProcessRunner>, spec: AppSpec) -> Self {
        Self::spawn_with_guard(settings, runner, spec, None)
    }

    fn spawn_with_guard(
        settings: Settings,
        runner: Arc<dyn ProcessRunner>,
        spec: AppSpec,
        guard: Option<BusyGuard>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || {
            let progress = tx.clone();
            let result = Provisioner::new(&settings, runner.as_ref()).provision(
                &spec,
                &mut |stage| {
                    // a dropped receiver only means nobody is listening
                    let _ = progress.send(JobEvent::Progress(stage));
                },
            );
            let terminal = match result {
                Ok(record) => JobEvent::Succeeded(record),
                Err(e) => JobEvent::Failed(e),
            };
            // free the runner before the controller can observe the outcome
            drop(guard);
            let _ = tx.send(terminal);
        });
        Self {
            events: rx,
            done: false,
        }
    }

    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        if self.done {
            return None;
        }
        match self.events.recv().await {
            Some(event) => {
                self.done = event.is_terminal();
                Some(event)
            }
            None => {
                // worker panicked before reporting
                self.done = true;
                Some(JobEvent::Failed(Error::GenericError(
                    "provisioning worker stopped without a result".into(),
                )))
            }
        }
    }

    /// Drains the job, passing each stage to `on_progress`.
    pub async fn wait(mut self, mut on_progress: impl FnMut(Stage)) -> Result<AppRecord> {
        while let Some(event) = self.next_event().await {
            match event {
                JobEvent::Progress(stage) => on_progress(stage),
                JobEvent::Succeeded(record) => return Ok(record),
                JobEvent::Failed(e) => return Err(e),
            }
        }
        Err(Error::GenericError("provisioning job already finished".into()))
    }
}

/// Clears the in-flight flag when dropped, including on worker panic.
#[derive(Debug)]
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Controller-side gate allowing a single provisioning job at a time.
#[derive(Debug, Clone, Default)]
pub struct JobRunner {
    busy: Arc<AtomicBool>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts a job unless one is still running.
    pub fn submit(
        &self,
        settings: Settings,
        runner: Arc<dyn ProcessRunner>,
        spec: AppSpec,
    ) -> std::result::Result<ProvisionJob, JobError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(JobError::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));
        Ok(ProvisionJob::spawn_with_guard(
            settings,
            runner,
            spec,
            Some(guard),
        ))
    }
}
