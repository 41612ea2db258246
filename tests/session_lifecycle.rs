//! Session controller lifecycle: start, stop, reconfigure, teardown.

use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use vault_redeemer::activity::LOG_CAPACITY;
use vault_redeemer::config::PollingConfig;
use vault_redeemer::session::{SessionConfig, SessionController, SessionError};

mod common;
use common::{MockConnector, MockVault};

fn controller(vault: Arc<MockVault>) -> SessionController {
    SessionController::new(
        Arc::new(MockConnector::new(vault)),
        PollingConfig::default(),
    )
}

fn count_messages(controller: &SessionController, prefix: &str) -> usize {
    controller
        .snapshot()
        .log
        .iter()
        .filter(|e| e.message.starts_with(prefix))
        .count()
}

#[tokio::test]
async fn test_start_without_config_fails() {
    let mut controller = controller(Arc::new(MockVault::new(0, 0)));

    let err = controller.start().await.unwrap_err();
    assert!(matches!(err, SessionError::Configuration(_)));

    let snapshot = controller.snapshot();
    assert!(!snapshot.state.running);
    assert_eq!(snapshot.state.last_error.as_deref(), Some("Please configure first"));
    assert!(snapshot.log.is_empty());
}

#[tokio::test]
async fn test_client_failure_never_enters_running() {
    let mut controller = SessionController::new(
        Arc::new(MockConnector::failing("PRIVATE_KEY is required")),
        PollingConfig::default(),
    );
    controller.configure(common::session_config());

    let err = controller.start().await.unwrap_err();
    assert!(matches!(err, SessionError::Blockchain(_)));
    assert!(!controller.is_running());
    assert!(controller
        .snapshot()
        .state
        .last_error
        .unwrap()
        .contains("PRIVATE_KEY is required"));
}

#[tokio::test(start_paused = true)]
async fn test_start_writes_bootstrap_then_checks_immediately() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());

    controller.start().await.unwrap();
    assert!(controller.is_running());
    assert_eq!(controller.operator(), Some(common::operator()));

    let messages: Vec<String> = controller
        .snapshot()
        .log
        .iter()
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Auto-redeem script started".to_string(),
            format!("Vault: {}", common::vault()),
            format!("Recipient address: {}", common::receiver()),
            format!("Operator address: {}", common::operator()),
            "Check interval: 1000ms".to_string(),
        ]
    );

    // A second start while running does not reset or spawn another loop.
    controller.start().await.unwrap();
    assert_eq!(controller.snapshot().log.len(), 5);

    // Cycle 1 runs without an initial delay.
    sleep(Duration::from_millis(1)).await;
    assert_eq!(vault.reads(), 1);
    assert_eq!(count_messages(&controller, "Checking vault"), 1);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(vault.reads(), 2);

    controller.stop();
}

#[tokio::test(start_paused = true)]
async fn test_polls_until_redeemable_then_stops() {
    let vault = Arc::new(
        MockVault::new(500, 300)
            .queue_position(0, 0)
            .queue_position(500, 0),
    );
    let mut controller = controller(vault.clone());
    let mut entries = controller.subscribe_log();
    controller.configure(common::session_config());

    controller.start().await.unwrap();
    controller.wait().await;

    assert_eq!(vault.reads(), 3);
    let submissions = vault.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].shares, U256::from(300));

    let snapshot = controller.snapshot();
    assert!(!snapshot.state.running);
    assert_eq!(snapshot.state.balance, Some(U256::from(500)));
    assert_eq!(snapshot.state.max_redeemable, Some(U256::from(300)));
    assert!(snapshot
        .log
        .last()
        .unwrap()
        .message
        .starts_with("Transaction confirmed successfully! Block: "));

    // Subscribers saw the same entries in the same order.
    let mut streamed = Vec::new();
    while let Ok(entry) = entries.try_recv() {
        streamed.push(entry);
    }
    assert_eq!(streamed, snapshot.log.to_vec());

    // Nothing is scheduled after the confirmed redemption.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(vault.reads(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_read_failure_keeps_session_running() {
    let vault = Arc::new(MockVault::new(0, 0).fail_balance_once("NetworkUnavailable"));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();

    sleep(Duration::from_millis(1)).await;
    let snapshot = controller.snapshot();
    assert!(snapshot.state.running);
    assert!(snapshot
        .state
        .last_error
        .unwrap()
        .contains("NetworkUnavailable"));
    assert_eq!(count_messages(&controller, "Error: "), 1);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(vault.reads(), 2);
    assert!(controller.snapshot().state.last_error.is_none());

    controller.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();
    sleep(Duration::from_millis(1)).await;

    controller.stop();
    let once = controller.snapshot();
    controller.stop();
    let twice = controller.snapshot();

    assert!(!twice.state.running);
    assert!(!twice.state.processing);
    assert_eq!(once, twice);
    assert_eq!(twice.log.last().unwrap().message, "Auto-redeem stopped");
    assert_eq!(count_messages(&controller, "Auto-redeem stopped"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_cycle_fires_after_stop() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();
    sleep(Duration::from_millis(1)).await;

    controller.stop();
    let reads = vault.reads();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(vault.reads(), reads);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_cycle_prevents_next_cycle() {
    let vault = Arc::new(MockVault::new(0, 0).with_read_delay(Duration::from_millis(500)));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();

    sleep(Duration::from_millis(100)).await;
    assert!(controller.snapshot().state.processing);

    controller.stop();
    let snapshot = controller.snapshot();
    assert!(!snapshot.state.running);
    assert!(!snapshot.state.processing);

    // The in-flight cycle finishes; no new one starts.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(vault.reads(), 1);
    assert_eq!(count_messages(&controller, "Checking vault"), 1);
    assert_eq!(count_messages(&controller, "No redeemable shares available"), 1);
    assert!(!controller.snapshot().state.processing);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_reads_never_submits() {
    let vault = Arc::new(MockVault::new(500, 300).with_read_delay(Duration::from_millis(500)));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();

    sleep(Duration::from_millis(100)).await;
    controller.stop();
    sleep(Duration::from_secs(5)).await;

    assert_eq!(vault.reads(), 1);
    assert!(vault.submissions().is_empty());
    assert_eq!(count_messages(&controller, "Found "), 0);
    assert_eq!(count_messages(&controller, "Transaction sent!"), 0);
    assert!(!controller.snapshot().state.running);
}

#[tokio::test(start_paused = true)]
async fn test_wait_after_stop_lets_cycle_finish() {
    let vault = Arc::new(MockVault::new(0, 0).with_read_delay(Duration::from_millis(500)));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();

    sleep(Duration::from_millis(100)).await;
    controller.stop();
    assert_eq!(count_messages(&controller, "No redeemable shares available"), 0);

    controller.wait().await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state.balance, Some(U256::ZERO));
    assert_eq!(
        snapshot.log.last().unwrap().message,
        "No redeemable shares available"
    );
    assert_eq!(vault.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_cycle() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();
    sleep(Duration::from_millis(1)).await;

    drop(controller);
    let reads = vault.reads();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(vault.reads(), reads);
}

#[tokio::test(start_paused = true)]
async fn test_reconfigure_stops_then_restarts_fresh() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();
    sleep(Duration::from_millis(1)).await;

    let other_vault = "0x4444444444444444444444444444444444444444";
    let config =
        SessionConfig::new("0x01", "http://127.0.0.1:8545", other_vault, common::RECEIVER).unwrap();
    controller.configure(config);

    assert!(!controller.is_running());
    assert_eq!(
        controller.snapshot().log.last().unwrap().message,
        "Auto-redeem stopped"
    );

    controller.start().await.unwrap();
    let snapshot = controller.snapshot();
    assert!(snapshot.state.running);
    assert_eq!(snapshot.log.len(), 5);
    assert_eq!(
        snapshot.log.iter().nth(1).unwrap().message,
        format!("Vault: {}", other_vault.parse::<alloy::primitives::Address>().unwrap())
    );

    controller.stop();
}

#[tokio::test(start_paused = true)]
async fn test_log_stays_bounded_over_long_sessions() {
    let vault = Arc::new(MockVault::new(0, 0));
    let mut controller = controller(vault.clone());
    controller.configure(common::session_config());
    controller.start().await.unwrap();

    // Three entries per idle cycle.
    sleep(Duration::from_secs(60)).await;
    assert!(vault.reads() > 40);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.log.len(), LOG_CAPACITY);
    assert!(snapshot
        .log
        .iter()
        .all(|e| e.message != "Auto-redeem script started"));

    controller.stop();
}
