use crate::config::HarnessConfig;
use crate::error::Result;
use crate::registry::SessionRegistry;
use crate::session::Session;
use crate::util;
use futures::future::BoxFuture;
use std::path::Path;
use std::time::Duration;
use webharness_capture::{Recorder, RecorderHandle, StepStatus};

/// Everything a test case body gets to work with: its sessions, the
/// in-flight recording, and the harness config.
pub struct CaseContext {
    pub sessions: SessionRegistry<Session>,
    recording: Option<RecorderHandle>,
    case_name: String,
    config: HarnessConfig,
}

impl CaseContext {
    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Log a step and push its label into the recording's status strip.
    pub fn step(&self, label: &str) {
        tracing::info!(case = %self.case_name, step = label, "step");
        if let Some(recording) = &self.recording {
            recording.annotate_step(label);
        }
    }

    /// Connect a browser and register it under `name`. The first
    /// session opened becomes the active one.
    pub async fn open_session(&mut self, name: &str) -> Result<()> {
        let session = Session::connect(name, &self.config).await?;
        self.sessions.insert(name, session)
    }
}

/// Runs test cases one at a time: starts the recording, hands the body
/// a [`CaseContext`], marks the strip with the verdict, then stops the
/// recording and closes every session before reporting the outcome.
pub struct CaseRunner {
    config: HarnessConfig,
    recorder: Option<Recorder>,
}

impl CaseRunner {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let recorder = if config.record {
            Some(Recorder::new(config.recording.clone())?)
        } else {
            None
        };
        Ok(Self { config, recorder })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run one case. The body borrows the context for its whole run, so
    /// it is passed as a boxed future:
    ///
    /// ```ignore
    /// runner.run_case("login", |cx| Box::pin(async move {
    ///     cx.open_session("main").await?;
    ///     cx.step("open login page");
    ///     Ok(())
    /// })).await?;
    /// ```
    ///
    /// Cleanup runs whether the body passes or fails; the body's error
    /// is returned afterwards.
    pub async fn run_case<F>(&self, name: &str, body: F) -> Result<()>
    where
        F: for<'a> FnOnce(&'a mut CaseContext) -> BoxFuture<'a, Result<()>>,
    {
        let recording = match &self.recorder {
            Some(recorder) => Some(recorder.start(name)?),
            None => None,
        };
        tracing::info!(case = name, "case started");

        let mut context = CaseContext {
            sessions: SessionRegistry::new(Duration::from_millis(self.config.switch_settle_ms)),
            recording,
            case_name: name.to_string(),
            config: self.config.clone(),
        };

        let outcome = body(&mut context).await;

        match &outcome {
            Ok(()) => {
                if let Some(recording) = &context.recording {
                    recording.set_status(StepStatus::Success);
                }
                tracing::info!(case = name, "case passed");
            }
            Err(error) => {
                if let Some(recording) = &context.recording {
                    recording.set_status(StepStatus::Failure);
                }
                tracing::error!(case = name, %error, "case failed");
            }
        }

        if let Some(recording) = context.recording.take() {
            let video = recording.stop();
            tracing::info!(
                case = name,
                video = %video.display(),
                evidence = %self.evidence_url(&video),
                "recording saved"
            );
        }
        context.sessions.close_all().await;

        outcome
    }

    /// Where the recording can be fetched from. Uses the configured
    /// base URL when set, otherwise this host's LAN address.
    fn evidence_url(&self, video: &Path) -> String {
        let relative = video
            .strip_prefix(&self.config.recording.save_dir)
            .unwrap_or(video);
        let base = match &self.config.evidence_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("http://{}", util::host_ip()),
        };
        format!("{}/{}", base, relative.display())
    }
}
