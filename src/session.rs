//! Browser session lifecycle: acquire with a flag set, release exactly
//! once.

use crate::config::BrowserConfig;
use crate::{Error, Result};
use thirtyfour::common::capabilities::desiredcapabilities::Capabilities;
use thirtyfour::prelude::*;
use tracing::{debug, warn};

/// Masks the most common automation marker. WebDriver has no emulation
/// channel for this, so it runs as a script after connect.
const HIDE_WEBDRIVER_JS: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
"#;

/// A live browser session bound to one WebDriver endpoint.
///
/// Exclusively owned by its creator. `close` tears the session down
/// exactly once; calling it again is a no-op. Operations on a closed
/// session fail with `Error::SessionClosed`.
pub struct Session {
    driver: Option<WebDriver>,
}

impl Session {
    /// Connect to the WebDriver endpoint and start a browser configured
    /// with the given flag set.
    ///
    /// On failure nothing was allocated: the error carries the driver's
    /// message and there is no handle to release.
    pub async fn start(config: &BrowserConfig) -> Result<Self> {
        let caps =
            build_capabilities(config).map_err(|e| Error::SessionStart(e.to_string()))?;

        debug!(
            "connecting to {} (headless: {})",
            config.webdriver_url, config.headless
        );
        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .map_err(|e| Error::SessionStart(e.to_string()))?;

        if config.suppress_automation {
            // Best effort; the session stays usable if injection fails.
            if let Err(e) = driver.execute(HIDE_WEBDRIVER_JS, vec![]).await {
                warn!("failed to mask navigator.webdriver: {}", e);
            }
        }

        Ok(Self {
            driver: Some(driver),
        })
    }

    /// The underlying driver, while the session is open.
    pub(crate) fn driver(&self) -> Result<&WebDriver> {
        self.driver.as_ref().ok_or(Error::SessionClosed)
    }

    /// Navigate to a URL.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver()?.goto(url).await?;
        Ok(())
    }

    /// The URL the browser is currently on.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver()?.current_url().await?.to_string())
    }

    /// Rendered text of the whole page body.
    pub async fn body_text(&self) -> Result<String> {
        let body = self.driver()?.find(By::Tag("body")).await?;
        Ok(body.text().await?)
    }

    /// Whether the session has been released.
    pub fn is_closed(&self) -> bool {
        self.driver.is_none()
    }

    /// Quit the browser and end the session.
    ///
    /// Only the first call does anything; releasing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.take() {
            debug!("closing session");
            driver.quit().await?;
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.driver.is_some() {
            warn!("session dropped without close; the driver may keep the browser alive");
        }
    }
}

/// Translate the flag set into browser arguments. Flags pass through
/// unvalidated; the driver is the arbiter of what they mean.
fn chrome_args(config: &BrowserConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if config.headless {
        args.push("--headless".into());
    }
    if config.start_maximized {
        args.push("--start-maximized".into());
    }
    if config.disable_infobars {
        args.push("--disable-infobars".into());
    }
    if config.disable_dev_shm_usage {
        args.push("--disable-dev-shm-usage".into());
    }
    if config.no_sandbox {
        args.push("--no-sandbox".into());
    }
    if config.suppress_automation {
        args.push("--disable-blink-features=AutomationControlled".into());
    }
    if let Some(ref ua) = config.user_agent {
        args.push(format!("--user-agent={}", ua));
    }
    if let Some(ref proxy) = config.proxy {
        args.push(format!("--proxy-server={}", proxy));
    }
    if let Some(size) = config.window_size {
        if !config.start_maximized {
            args.push(format!("--window-size={},{}", size.width, size.height));
        }
    }
    args.extend(config.args.iter().cloned());

    args
}

fn build_capabilities(config: &BrowserConfig) -> WebDriverResult<Capabilities> {
    let mut caps = DesiredCapabilities::chrome();

    if config.ignore_certificate_errors {
        caps.accept_insecure_certs(true)?;
    }

    for arg in chrome_args(config) {
        caps.add_arg(&arg)?;
    }

    Ok(caps.into())
}
