//! Integration tests for pagewatch
//!
//! These tests require a chromedriver listening on localhost:9515 and a
//! Chrome binary. Run with: cargo test --test integration -- --ignored

use pagewatch::{
    login, poll_loop, wait_for_visible, BrowserConfig, Config, Error, Locator, LoginConfig,
    MemorySink, Runner, Session, WatchConfig,
};
use std::time::Duration;

fn test_browser() -> BrowserConfig {
    BrowserConfig {
        headless: true,
        no_sandbox: true,
        disable_dev_shm_usage: true,
        ..BrowserConfig::default()
    }
}

fn watch(field: Locator, iterations: u32) -> WatchConfig {
    WatchConfig {
        field,
        iterations,
        interval_ms: 100,
        timeout_ms: 2000,
        source: "test".into(),
    }
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_close_is_idempotent() {
    let mut session = Session::start(&test_browser())
        .await
        .expect("Failed to start session");
    assert!(!session.is_closed());

    session.close().await.expect("Failed to close session");
    assert!(session.is_closed());

    // Second release is a no-op
    session.close().await.expect("Second close should be a no-op");
    assert!(session.is_closed());
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_operations_fail_after_close() {
    let mut session = Session::start(&test_browser())
        .await
        .expect("Failed to start session");
    session.close().await.expect("Failed to close session");

    let result = session.goto("data:text/html,<p>hi</p>").await;
    assert!(matches!(result, Err(Error::SessionClosed)));
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_poll_loop_invokes_sink_exactly_n_times() {
    let mut session = Session::start(&test_browser())
        .await
        .expect("Failed to start session");

    session
        .goto(r#"data:text/html,<div id="reading">20°C</div>"#)
        .await
        .expect("Failed to navigate");

    let mut sink = MemorySink::new();
    let values = poll_loop(&session, &watch(Locator::Css("#reading".into()), 3), &mut sink)
        .await
        .expect("Poll loop failed");

    assert_eq!(values, vec!["20°C", "20°C", "20°C"]);
    assert_eq!(sink.records.len(), 3);
    assert_eq!(sink.messages(), vec!["20°C", "20°C", "20°C"]);

    session.close().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_wait_for_visible_times_out() {
    let mut session = Session::start(&test_browser())
        .await
        .expect("Failed to start session");

    session
        .goto(r#"data:text/html,<p>nothing here</p>"#)
        .await
        .expect("Failed to navigate");

    let result = wait_for_visible(
        &session,
        &Locator::Css("#missing".into()),
        Duration::from_millis(1000),
    )
    .await;
    assert!(matches!(result, Err(Error::ElementTimeout { .. })));

    // The session survives the timeout and still releases cleanly
    session.close().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_login_flow() {
    let mut session = Session::start(&test_browser())
        .await
        .expect("Failed to start session");

    // A form that swaps itself for a Welcome link once submitted.
    session
        .goto(
            r#"data:text/html,
        <script>
        function accept(e) {
            e.preventDefault();
            document.getElementById('f').remove();
            var a = document.createElement('a');
            a.href = '%23';
            a.textContent = 'Welcome';
            document.body.appendChild(a);
        }
        </script>
        <form id="f" onsubmit="accept(event)">
            <input id="user">
            <input id="pass" type="password">
            <button type="submit">Log in</button>
        </form>
    "#,
        )
        .await
        .expect("Failed to navigate");

    let form = LoginConfig {
        username_field: Locator::Id("user".into()),
        username: "alice".into(),
        password_field: Locator::Id("pass".into()),
        password: "secret".into(),
        submit: Locator::XPath("//button[@type='submit']".into()),
        landing: Some(Locator::LinkText("Welcome".into())),
        timeout_ms: 2000,
    };

    login(&session, &form).await.expect("Login failed");

    let text = session.body_text().await.expect("Failed to read body");
    assert!(text.contains("Welcome"), "body: {}", text);

    session.close().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_runner_reports_timeout_after_release() {
    let yaml = r##"
name: "Timeout run"
target:
  url: "data:text/html,<p>static</p>"
watch:
  field: { css: "#never" }
  iterations: 1
  timeout_ms: 500
"##;
    let mut config = Config::parse(yaml).expect("Failed to parse config");
    config.browser = test_browser();

    let runner = Runner::new(&config.browser)
        .await
        .expect("Failed to start runner");
    let result = runner.run(&config).await;

    // The timeout surfaces as-is; the session was released internally.
    assert!(matches!(result, Err(Error::ElementTimeout { .. })));
}

#[tokio::test]
#[ignore = "requires chromedriver"]
async fn test_runner_success_conditions() {
    let yaml = r##"
name: "Happy run"
target:
  url: "data:text/html,<div id='reading'>21°C</div>"
watch:
  field: { css: "#reading" }
  iterations: 2
  interval_ms: 100
success:
  all:
    - text_contains: "21°C"
"##;
    let mut config = Config::parse(yaml).expect("Failed to parse config");
    config.browser = test_browser();

    let runner = Runner::new(&config.browser)
        .await
        .expect("Failed to start runner");
    let result = runner.run(&config).await.expect("Run failed");

    assert!(result.success);
    assert_eq!(result.values, vec!["21°C", "21°C"]);
    assert!(result.error.is_none());
    assert!(result.final_url.starts_with("data:"));
}
