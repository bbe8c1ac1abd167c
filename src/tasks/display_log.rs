//! Log presenter: renders display updates as tracing events

use std::collections::HashMap;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::state::{Status, TimerId, TimerView};

/// Background task that logs every display update.
///
/// Status changes are logged at info, plain ticks at debug. Returns once
/// every sender of `updates` is gone.
pub async fn display_log_task(mut updates: broadcast::Receiver<TimerView>) -> usize {
    info!("Starting display log task");

    let mut rendered = 0;
    let mut last_status: HashMap<TimerId, Status> = HashMap::new();

    loop {
        match updates.recv().await {
            Ok(view) => {
                rendered += 1;
                let previous = last_status.insert(view.id, view.status);
                if previous != Some(view.status) {
                    info!(
                        "{} is {} at {} ({:.0}%)",
                        view.label,
                        view.status,
                        view.formatted_time,
                        view.progress * 100.0
                    );
                } else {
                    debug!(
                        "{} {} {} progress={:.3}",
                        view.label, view.formatted_time, view.remaining_text, view.progress
                    );
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display log fell behind, skipped {} updates", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Display update channel closed, stopping display log task");
                break;
            }
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Countdown;

    fn view(id: u32, countdown: &Countdown) -> TimerView {
        TimerView::project(TimerId(id), &format!("Timer {}", id), countdown, "60")
    }

    #[tokio::test]
    async fn renders_until_the_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        let task = tokio::spawn(display_log_task(rx));

        let mut countdown = Countdown::new();
        tx.send(view(1, &countdown)).unwrap();
        countdown.start("5").unwrap();
        tx.send(view(1, &countdown)).unwrap();
        tx.send(view(2, &countdown)).unwrap();
        drop(tx);

        assert_eq!(task.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn survives_falling_behind() {
        let (tx, rx) = broadcast::channel(2);
        let countdown = Countdown::new();
        for _ in 0..5 {
            tx.send(view(1, &countdown)).unwrap();
        }
        drop(tx);

        // three updates were overwritten before the task ever ran
        assert_eq!(display_log_task(rx).await, 2);
    }
}
