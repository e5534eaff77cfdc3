use crate::publisher::PublishError;
use tokio::sync::mpsc::UnboundedSender;

/// Receives the publisher-error signal.
pub trait PublisherListener: Send + Sync {
    fn on_publisher_error(&self, error: &PublishError);
}

impl PublisherListener for UnboundedSender<PublishError> {
    fn on_publisher_error(&self, error: &PublishError) {
        // The receiving side may already be gone, the signal is fire-and-forget
        let _ = self.send(error.clone());
    }
}
