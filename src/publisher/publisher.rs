use crate::app_config::AppConfig;
use crate::domain::{MockLocation, PublishRequest};
use crate::publisher::{LocationProvider, ProviderError, PublisherListener};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, trace};

type Listeners = Arc<RwLock<Vec<Arc<dyn PublisherListener>>>>;

#[derive(Clone, PartialEq, Debug)]
pub enum PublisherStatus {
    Idle,
    Publishing { latitude: f64, longitude: f64 },
}

impl Display for PublisherStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PublisherStatus::Idle => write!(f, "Idle"),
            PublisherStatus::Publishing { latitude, longitude } => write!(f, "Lat: {} | Lon: {}", latitude, longitude),
        }
    }
}

#[derive(Error, Clone, PartialEq, Debug)]
pub enum PublishError {
    #[error("mock location rejected: {0}")]
    Rejected(#[from] ProviderError),
}

/// Repeatedly writes a fixed location to a [`LocationProvider`].
///
/// At most one session is active at a time. A session runs on its own task until [`stop`](Self::stop)
/// is called, a new session is started, or the provider rejects a write. In the last case every
/// registered [`PublisherListener`] is notified once and the session ends.
pub struct MockLocationPublisher {
    provider: Arc<dyn LocationProvider>,
    accuracy: f32,
    origin: Instant,
    listeners: Listeners,
    status_tx: Arc<watch::Sender<PublisherStatus>>,
    session: Mutex<Option<Session>>,
}

struct Session {
    handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl Session {
    async fn shutdown(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.handle.await {
            error!("❌ Publish loop did not end cleanly: {}", e);
        }
    }
}

impl MockLocationPublisher {
    pub fn new(provider: Arc<dyn LocationProvider>, config: &AppConfig) -> Self {
        let (status_tx, _) = watch::channel(PublisherStatus::Idle);

        MockLocationPublisher {
            provider,
            accuracy: config.publisher().accuracy_m(),
            origin: Instant::now(),
            listeners: Arc::new(RwLock::new(Vec::new())),
            status_tx: Arc::new(status_tx),
            session: Mutex::new(None),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn PublisherListener>) {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner).push(listener);
    }

    pub fn status(&self) -> watch::Receiver<PublisherStatus> {
        self.status_tx.subscribe()
    }

    #[instrument(skip_all, fields(latitude = request.location.latitude, longitude = request.location.longitude))]
    pub async fn start(&self, request: PublishRequest) {
        let mut session = self.session.lock().await;
        if let Some(previous) = session.take() {
            debug!("🛰️ Replacing the active session...");
            previous.shutdown().await;
        }

        self.status_tx.send_replace(PublisherStatus::Publishing {
            latitude: request.location.latitude,
            longitude: request.location.longitude,
        });

        let cancellation_token = CancellationToken::new();
        let publish_loop = PublishLoop {
            provider: self.provider.clone(),
            request,
            accuracy: self.accuracy,
            origin: self.origin,
            listeners: self.listeners.clone(),
            status_tx: self.status_tx.clone(),
            cancellation_token: cancellation_token.clone(),
        };
        let handle = tokio::spawn(publish_loop.run());

        *session = Some(Session { handle, cancellation_token });
        info!(interval = ?request.refresh_interval, "🛰️ Publishing mock location to provider '{}'", self.provider.name());
    }

    #[instrument(skip_all)]
    pub async fn stop(&self) {
        let Some(session) = self.session.lock().await.take() else {
            debug!("🛑 No active session to stop");
            return;
        };

        session.shutdown().await;
        info!("🛑 Stopped publishing mock location");
    }
}

impl Drop for MockLocationPublisher {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut() {
            session.cancellation_token.cancel();
        }
    }
}

struct PublishLoop {
    provider: Arc<dyn LocationProvider>,
    request: PublishRequest,
    accuracy: f32,
    origin: Instant,
    listeners: Listeners,
    status_tx: Arc<watch::Sender<PublisherStatus>>,
    cancellation_token: CancellationToken,
}

impl PublishLoop {
    #[instrument(name = "publish_loop", skip_all)]
    async fn run(self) {
        let mut registered = false;

        loop {
            if let Err(e) = self.tick(&mut registered).await {
                let error = PublishError::from(e);
                error!("❌ Publishing mock location... failed, {}", error);
                self.notify(&error);
                break;
            }

            tokio::select! {
                _ = self.cancellation_token.cancelled() => break,
                _ = sleep(self.request.refresh_interval) => {}
            }
        }

        self.cleanup().await;
    }

    async fn tick(&self, registered: &mut bool) -> Result<(), ProviderError> {
        if !*registered {
            self.provider.add_test_provider().await?;
            self.provider.set_test_provider_enabled(true).await?;
            *registered = true;
        }

        let location = MockLocation::new(self.provider.name(), self.request.location, self.accuracy, self.origin.elapsed());
        self.provider.set_test_provider_location(&location).await?;
        trace!(time = %location.time, accuracy = location.accuracy, elapsed_realtime = ?location.elapsed_realtime, "Publishing mock location... OK");
        Ok(())
    }

    fn notify(&self, error: &PublishError) {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener.on_publisher_error(error);
        }
    }

    async fn cleanup(&self) {
        // The provider may be gone already or the privilege revoked, either way nothing is mocked anymore
        if let Err(e) = self.provider.remove_test_provider().await {
            debug!("Removing test provider '{}'... ignored, {}", self.provider.name(), e);
        }
        self.status_tx.send_replace(PublisherStatus::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::domain::GeoLocation;
    use crate::publisher::SimulatedLocationProvider;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_log::test;
    use tokio::sync::mpsc;

    const INTERVAL: Duration = Duration::from_millis(2000);

    fn request(latitude: f64, longitude: f64) -> PublishRequest {
        PublishRequest::new(
            GeoLocation {
                latitude,
                longitude,
                altitude: 12.0,
            },
            INTERVAL,
        )
    }

    fn publisher(mock_location_allowed: bool) -> (MockLocationPublisher, Arc<SimulatedLocationProvider>) {
        let provider = Arc::new(SimulatedLocationProvider::new("gps", mock_location_allowed));
        let publisher = MockLocationPublisher::new(provider.clone(), &AppConfigBuilder::new().build());
        (publisher, provider)
    }

    async fn settle() {
        sleep(Duration::from_millis(1)).await;
    }

    #[test(tokio::test(start_paused = true))]
    async fn publishes_immediately_after_starting() {
        let (publisher, provider) = publisher(true);

        publisher.start(request(37.4219, -122.0841)).await;
        settle().await;

        assert!(provider.is_registered());
        assert!(provider.is_enabled());
        let location = provider.last_location().unwrap();
        assert_eq!(location.provider, "gps");
        assert_eq!(location.geo_location(), request(37.4219, -122.0841).location);
        assert_eq!(location.accuracy, 1.0);
        assert_eq!(
            *publisher.status().borrow(),
            PublisherStatus::Publishing {
                latitude: 37.4219,
                longitude: -122.0841
            }
        );
    }

    #[test(tokio::test(start_paused = true))]
    async fn republishes_every_refresh_interval() {
        let (publisher, provider) = publisher(true);

        publisher.start(request(1.0, 2.0)).await;
        sleep(Duration::from_millis(4500)).await;

        let locations = provider.locations();
        assert_eq!(locations.len(), 3);
        assert!(locations.windows(2).all(|pair| pair[0].elapsed_realtime < pair[1].elapsed_realtime));
    }

    #[test(tokio::test(start_paused = true))]
    async fn stopping_removes_the_test_provider() {
        let (publisher, provider) = publisher(true);

        publisher.start(request(1.0, 2.0)).await;
        settle().await;
        publisher.stop().await;

        assert!(!provider.is_registered());
        assert_eq!(*publisher.status().borrow(), PublisherStatus::Idle);

        sleep(INTERVAL * 3).await;
        assert_eq!(provider.locations().len(), 1);
    }

    #[test(tokio::test(start_paused = true))]
    async fn stopping_is_idempotent() {
        let (publisher, provider) = publisher(true);

        publisher.stop().await;
        publisher.start(request(1.0, 2.0)).await;
        settle().await;
        publisher.stop().await;
        publisher.stop().await;

        assert!(!provider.is_registered());
        assert_eq!(*publisher.status().borrow(), PublisherStatus::Idle);
    }

    #[test(tokio::test(start_paused = true))]
    async fn a_rejected_write_signals_listeners_once_and_ends_the_session() {
        let (publisher, provider) = publisher(false);
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<PublishError>();
        publisher.add_listener(Arc::new(error_tx));
        let mut status = publisher.status();

        publisher.start(request(1.0, 2.0)).await;
        status.wait_for(|status| *status == PublisherStatus::Idle).await.unwrap();
        sleep(INTERVAL * 5).await;

        assert!(matches!(error_rx.try_recv(), Ok(PublishError::Rejected(ProviderError::PermissionDenied(_)))));
        assert!(error_rx.try_recv().is_err());
        assert!(provider.locations().is_empty());
        assert!(!provider.is_registered());
    }

    #[test(tokio::test(start_paused = true))]
    async fn a_revoked_privilege_ends_an_active_session() {
        let (publisher, provider) = publisher(true);
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<PublishError>();
        publisher.add_listener(Arc::new(error_tx));

        publisher.start(request(1.0, 2.0)).await;
        settle().await;
        provider.set_mock_location_allowed(false);
        sleep(INTERVAL * 5).await;

        assert!(error_rx.try_recv().is_ok());
        assert!(error_rx.try_recv().is_err());
        assert_eq!(provider.locations().len(), 1);
        assert!(!provider.is_registered());
        assert_eq!(*publisher.status().borrow(), PublisherStatus::Idle);
    }

    #[test(tokio::test(start_paused = true))]
    async fn starting_again_replaces_the_active_session() {
        let (publisher, provider) = publisher(true);

        publisher.start(request(1.0, 2.0)).await;
        settle().await;
        publisher.start(request(3.0, 4.0)).await;
        sleep(Duration::from_millis(4500)).await;

        let locations = provider.locations();
        assert_eq!(locations.iter().filter(|location| location.latitude == 1.0).count(), 1);
        assert_eq!(locations.iter().filter(|location| location.latitude == 3.0).count(), 3);
        assert!(provider.is_registered());
        assert_eq!(
            *publisher.status().borrow(),
            PublisherStatus::Publishing {
                latitude: 3.0,
                longitude: 4.0
            }
        );
    }

    #[test]
    fn displays_the_status_indicator_text() {
        let status = PublisherStatus::Publishing {
            latitude: 12.9,
            longitude: 77.6,
        };
        assert_eq!(status.to_string(), "Lat: 12.9 | Lon: 77.6");
    }
}
