//! OS signal wiring for the run controller
//!
//! Maps process signals onto controller transitions:
//! - **SIGINT / Ctrl-C**: cancel the run (orderly teardown, non-zero exit)
//! - **SIGUSR1**: pause all workers
//! - **SIGUSR2**: resume all workers
//!
//! SIGUSR1/SIGUSR2 are used instead of SIGTSTP/SIGCONT because a stopped
//! process has no runnable thread left to keep the pause clocks and the
//! condvar honest. On non-Unix platforms only Ctrl-C is handled.

use std::sync::Arc;

use super::RunController;

/// Spawn a background task that drives `controller` from OS signals
///
/// Lives until the process exits; once a cancellation has been delivered
/// the task ends.
pub fn spawn_signal_watcher(controller: Arc<RunController>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = watch(controller).await {
            tracing::error!("signal watcher failed: {e}");
        }
    })
}

#[cfg(unix)]
async fn watch(controller: Arc<RunController>) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut pause = signal(SignalKind::user_defined1())?;
    let mut resume = signal(SignalKind::user_defined2())?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                controller.cancel();
                return Ok(());
            }
            _ = pause.recv() => controller.pause(),
            _ = resume.recv() => controller.resume(),
        }
    }
}

#[cfg(not(unix))]
async fn watch(controller: Arc<RunController>) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    controller.cancel();
    Ok(())
}
