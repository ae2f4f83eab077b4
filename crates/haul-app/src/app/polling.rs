use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::App;

const TICK: Duration = Duration::from_secs(1);

/// Background refresh loop for an active session
///
/// Ticks once a second and starts a refresh every `every_ticks` ticks. A
/// refresh still in flight when the next one is due makes that one a no-op.
/// The loop ends when `cancel` fires or the session is signed out.
pub fn spawn_polling(app: Arc<App>, every_ticks: u32, cancel: CancellationToken) -> JoinHandle<()> {
    let every_ticks = every_ticks.max(1);
    tokio::spawn(async move {
        info!("Polling started (every {} ticks)", every_ticks);
        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut countdown = every_ticks;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Polling stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if !app.has_session().await {
                        info!("Session ended, polling stopped");
                        break;
                    }
                    countdown -= 1;
                    if countdown == 0 {
                        countdown = every_ticks;
                        debug!("Refresh due");
                        let app = Arc::clone(&app);
                        tokio::spawn(async move {
                            app.refresh().await;
                        });
                    }
                }
            }
        }
    })
}
