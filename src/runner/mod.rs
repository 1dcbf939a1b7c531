//! Drives a full watch run: navigate, log in, poll, release.

use crate::config::{BrowserConfig, Condition, Config};
use crate::session::Session;
use crate::sink::{FileSink, LogSink, RecordSink};
use crate::{login, poll, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one watch run.
#[derive(Debug)]
pub struct RunResult {
    /// Whether the flow completed and its success conditions held.
    pub success: bool,
    /// Why the success conditions did not hold, if they didn't.
    pub error: Option<String>,
    /// Values read by the watch loop, in order.
    pub values: Vec<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// URL the session ended on.
    pub final_url: String,
}

/// Executes one config against one browser session.
pub struct Runner {
    session: Session,
}

impl Runner {
    /// Acquire a session for the given browser configuration.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        Ok(Self {
            session: Session::start(config).await?,
        })
    }

    /// The underlying session, for callers composing their own flow.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the config to completion.
    ///
    /// Consumes the runner: the session is released on every exit path —
    /// normal completion, unmet success conditions, or any error — before
    /// the outcome is returned.
    pub async fn run(mut self, config: &Config) -> Result<RunResult> {
        let start = Instant::now();
        let outcome = self.run_flow(config).await;
        let released = self.session.close().await;

        let (values, success, final_url) = outcome?;
        released?;

        Ok(RunResult {
            success,
            error: (!success).then(|| "success conditions not met".to_string()),
            values,
            duration_ms: start.elapsed().as_millis() as u64,
            final_url,
        })
    }

    async fn run_flow(&mut self, config: &Config) -> Result<(Vec<String>, bool, String)> {
        info!("navigating to {}", config.target.url);
        self.session.goto(&config.target.url).await?;

        if let Some(ref form) = config.login {
            login::login(&self.session, form).await?;
        }

        let mut values = Vec::new();
        if let Some(ref watch) = config.watch {
            let mut sink: Box<dyn RecordSink> = match config.log {
                Some(ref log) => {
                    info!("recording {} readings to {}", watch.iterations, log.path);
                    Box::new(FileSink::open(&log.path)?)
                }
                None => Box::new(LogSink),
            };
            values = poll::poll_loop(&self.session, watch, sink.as_mut()).await?;
        }

        let success = self.check_success(config).await?;
        debug!("success check: {}", success);

        let final_url = self.session.current_url().await?;
        Ok((values, success, final_url))
    }

    async fn check_success(&self, config: &Config) -> Result<bool> {
        let Some(ref success) = config.success else {
            return Ok(true);
        };

        if let Some(ref any) = success.any {
            for cond in any {
                if self.check_condition(cond).await? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        if let Some(ref all) = success.all {
            for cond in all {
                if !self.check_condition(cond).await? {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    async fn check_condition(&self, condition: &Condition) -> Result<bool> {
        match condition {
            Condition::UrlContains(pattern) => {
                let url = self.session.current_url().await?;
                Ok(url.contains(pattern))
            }
            Condition::TextContains(pattern) => {
                let text = self.session.body_text().await?;
                Ok(text.contains(pattern))
            }
        }
    }
}
