use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Date and time lines for the clock card: `("Monday, 15/01/2024", "08:00:00")`.
pub fn clock_face(now: DateTime<Local>) -> (String, String) {
    (
        now.format("%A, %d/%m/%Y").to_string(),
        now.format("%H:%M:%S").to_string(),
    )
}

/// Publishes the wall-clock time every `period`. Independent of record state;
/// the task ends once every receiver is dropped.
pub fn spawn_ticker(period: Duration) -> (watch::Receiver<DateTime<Local>>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(Local::now());

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(Local::now()).is_err() {
                break;
            }
        }
    });

    (rx, handle)
}
