use crate::publisher::PublisherStatus;
use tokio::sync::watch::Receiver;
use tracing::{info, instrument};

/// Keeps the running indicator in sync with the publisher, visible while publishing and gone when idle.
#[instrument(skip_all)]
pub async fn status_listener(mut rx: Receiver<PublisherStatus>) {
    while rx.changed().await.is_ok() {
        let status = rx.borrow_and_update().clone();
        match status {
            PublisherStatus::Publishing { .. } => info!("📡 Mock Location Service, {}", status),
            PublisherStatus::Idle => info!("💤 Mock Location Service is idle"),
        }
    }
}
