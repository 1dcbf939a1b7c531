//! Bounded polling of one page field: wait until visible, read its text,
//! hand each reading to a sink.

use crate::config::{Locator, WatchConfig};
use crate::session::Session;
use crate::sink::{Record, RecordSink, Severity};
use crate::{Error, Result};
use std::time::Duration;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::debug;

/// How often the driver re-checks while waiting for visibility.
const DRIVER_POLL: Duration = Duration::from_millis(100);

/// A located page field, still bound to the locator that found it.
#[derive(Debug, Clone)]
pub struct FieldRef {
    element: WebElement,
    locator: Locator,
}

impl FieldRef {
    /// The locator this field was found with.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Current rendered text of the field.
    pub async fn text(&self) -> Result<String> {
        self.element
            .text()
            .await
            .map_err(|e| classify_element_error(e, &self.locator))
    }

    /// Type into the field.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        self.element
            .send_keys(text)
            .await
            .map_err(|e| classify_element_error(e, &self.locator))
    }

    /// Activate the field.
    pub async fn click(&self) -> Result<()> {
        self.element
            .click()
            .await
            .map_err(|e| classify_element_error(e, &self.locator))
    }
}

/// Block until the first element matching `locator` is present and
/// displayed, or fail with `Error::ElementTimeout` once `timeout` has
/// elapsed.
pub async fn wait_for_visible(
    session: &Session,
    locator: &Locator,
    timeout: Duration,
) -> Result<FieldRef> {
    let driver = session.driver()?;
    let element = driver
        .query(locator.by())
        .wait(timeout, DRIVER_POLL)
        .and_displayed()
        .first()
        .await
        .map_err(|e| classify_wait_error(e, locator, timeout))?;

    Ok(FieldRef {
        element,
        locator: locator.clone(),
    })
}

/// Current rendered text of a previously located field.
pub async fn read_text(field: &FieldRef) -> Result<String> {
    field.text().await
}

/// Wait for the watched field, read it, and record it — exactly
/// `iterations` times, sleeping `interval_ms` between iterations and not
/// after the last. The first timeout or stale read aborts the remaining
/// iterations; nothing is retried.
pub async fn poll_loop(
    session: &Session,
    watch: &WatchConfig,
    sink: &mut dyn RecordSink,
) -> Result<Vec<String>> {
    let timeout = Duration::from_millis(watch.timeout_ms);
    let mut values = Vec::with_capacity(watch.iterations as usize);

    for i in 0..watch.iterations {
        let field = wait_for_visible(session, &watch.field, timeout).await?;
        let text = read_text(&field).await?;
        debug!("poll {}/{}: '{}'", i + 1, watch.iterations, text);

        sink.record(Record::new(&watch.source, Severity::Info, &text))?;
        values.push(text);

        if i + 1 < watch.iterations {
            sleep(Duration::from_millis(watch.interval_ms)).await;
        }
    }

    Ok(values)
}

// The WebDriver protocol names its failures in the error text ("no such
// element", "stale element reference"); classification keys on those so
// anything unrecognized passes through untouched.

fn classify_wait_error(err: WebDriverError, locator: &Locator, timeout: Duration) -> Error {
    let text = err.to_string().to_ascii_lowercase();
    if text.contains("no such element") || text.contains("timeout") || text.contains("timed out")
    {
        Error::ElementTimeout {
            locator: locator.clone(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Driver(err)
    }
}

fn classify_element_error(err: WebDriverError, locator: &Locator) -> Error {
    if err.to_string().to_ascii_lowercase().contains("stale element") {
        Error::StaleElement {
            locator: locator.clone(),
        }
    } else {
        Error::Driver(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_wait_timeout() {
        let locator = Locator::Css("#reading".into());
        let err = WebDriverError::Timeout("no such element: waited 10s".into());
        let classified = classify_wait_error(err, &locator, Duration::from_secs(10));
        assert!(matches!(
            classified,
            Error::ElementTimeout { timeout_ms: 10000, .. }
        ));
    }

    #[test]
    fn test_classify_wait_passthrough() {
        let locator = Locator::Css("#reading".into());
        let err = WebDriverError::FatalError("session not created".into());
        let classified = classify_wait_error(err, &locator, Duration::from_secs(10));
        assert!(matches!(classified, Error::Driver(_)));
    }

    #[test]
    fn test_classify_stale() {
        let locator = Locator::Id("reading".into());
        let err = WebDriverError::FatalError(
            "stale element reference: element is not attached to the page document".into(),
        );
        let classified = classify_element_error(err, &locator);
        assert!(matches!(classified, Error::StaleElement { .. }));
    }
}
