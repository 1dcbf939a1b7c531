//! Form login: fill two fields, submit, optionally follow a landing
//! element.

use crate::config::LoginConfig;
use crate::poll::wait_for_visible;
use crate::session::Session;
use crate::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Drive the login form described by `form`.
///
/// Every step waits for its target to become visible before interacting,
/// sharing the flow's timeout. Credential validation is the target
/// site's business; a step that cannot find its element fails with the
/// usual timeout/stale errors and aborts the flow.
pub async fn login(session: &Session, form: &LoginConfig) -> Result<()> {
    let timeout = Duration::from_millis(form.timeout_ms);

    info!("login: filling {}", form.username_field);
    let username = wait_for_visible(session, &form.username_field, timeout).await?;
    username.type_text(&form.username).await?;

    debug!("login: filling {}", form.password_field);
    let password = wait_for_visible(session, &form.password_field, timeout).await?;
    password.type_text(&form.password).await?;

    debug!("login: activating {}", form.submit);
    let submit = wait_for_visible(session, &form.submit, timeout).await?;
    submit.click().await?;

    if let Some(ref landing) = form.landing {
        debug!("login: following {}", landing);
        let link = wait_for_visible(session, landing, timeout).await?;
        link.click().await?;
    }

    Ok(())
}
