use calllog::application::{CallLogManager, CallLogWriter, CallsManager};
use calllog::config::Config;
use calllog::domain::call::{Call, CallState};
use calllog::domain::shared::value_objects::Handle;
use calllog::infrastructure::{logging, metrics, persistence};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    // Initialize tracing
    logging::init(&config.logging);

    info!("Starting call log service");
    info!("Configuration loaded: {:?}", config);

    if let Some(listen) = config.metrics.listen {
        metrics::init_metrics(listen)?;
    }

    let store = persistence::open_store(&config.store).await?;
    let writer = Arc::new(CallLogWriter::start(store, &config.writer));

    let call_log_manager = Arc::new(CallLogManager::new(
        config.call_log.policy(),
        Arc::new(config.call_log.emergency_numbers()),
        writer.clone(),
    ));

    let calls_manager = CallsManager::new();
    calls_manager.add_listener(call_log_manager);

    demo_call_lifecycle(&calls_manager)?;

    writer.shutdown().await;
    info!("Call log service stopped");

    Ok(())
}

/// Drive a few calls through their lifecycle so each kind of entry gets logged
fn demo_call_lifecycle(calls_manager: &CallsManager) -> anyhow::Result<()> {
    info!("=== Call Lifecycle Demo ===");

    // Answered incoming call
    let mut incoming = Call::new(true, Some(Handle::parse("tel:+1 (555) 010-0001")?));
    calls_manager.set_call_state(&mut incoming, CallState::Ringing)?;
    calls_manager.set_call_state(&mut incoming, CallState::Active)?;
    calls_manager.set_call_state(&mut incoming, CallState::Disconnected)?;

    // Missed call
    let mut missed = Call::new(true, Some(Handle::tel("555-010-0002")));
    calls_manager.set_call_state(&mut missed, CallState::Ringing)?;
    calls_manager.set_call_state(&mut missed, CallState::Disconnected)?;

    // Outgoing SIP call that never connected
    let mut outgoing = Call::new(false, Some(Handle::sip("bob@example.com")));
    calls_manager.set_call_state(&mut outgoing, CallState::Dialing)?;
    calls_manager.set_call_state(&mut outgoing, CallState::Aborted)?;

    // Emergency call, only logged when policy allows it
    let mut emergency = Call::new(false, Some(Handle::tel("911")));
    calls_manager.set_call_state(&mut emergency, CallState::Dialing)?;
    calls_manager.set_call_state(&mut emergency, CallState::Active)?;
    calls_manager.set_call_state(&mut emergency, CallState::Disconnected)?;

    info!("=== Call Lifecycle Demo Complete ===");
    Ok(())
}
