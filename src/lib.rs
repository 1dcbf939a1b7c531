//! # pagewatch
//!
//! Config-based page watching. Define a browser flag set, an optional
//! login flow, and a bounded field-polling loop in YAML, run it against a
//! WebDriver endpoint, and append every reading to a log file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pagewatch::{Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> pagewatch::Result<()> {
//! let config = Config::load("watch.yaml")?;
//! let runner = Runner::new(&config.browser).await?;
//! let result = runner.run(&config).await?;
//! println!("Success: {}", result.success);
//! # Ok(())
//! # }
//! ```

mod config;
mod login;
mod poll;
mod runner;
mod session;
mod sink;

pub use config::{
    BrowserConfig, Condition, Config, Locator, LogConfig, LoginConfig, ParamDef, Params,
    SuccessCondition, TargetUrl, WatchConfig, WindowSize,
};
pub use login::login;
pub use poll::{poll_loop, read_text, wait_for_visible, FieldRef};
pub use runner::{RunResult, Runner};
pub use session::Session;
pub use sink::{FileSink, LogSink, MemorySink, Record, RecordSink, Severity};

/// Result type for pagewatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a watch run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session start failed: {0}")]
    SessionStart(String),

    #[error("session already closed")]
    SessionClosed,

    #[error("no visible element for {locator} within {timeout_ms}ms")]
    ElementTimeout { locator: Locator, timeout_ms: u64 },

    #[error("element for {locator} is no longer attached to the page")]
    StaleElement { locator: Locator },

    #[error("webdriver error: {0}")]
    Driver(#[from] thirtyfour::error::WebDriverError),
}
