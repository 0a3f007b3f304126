//! Location providers: where fresh coordinates come from.

use std::future::Future;
use std::time::Duration;

use crate::types::{Coordinates, LocationError};

/// A source of the device's current coordinates.
///
/// Implementations fail with `PermissionDenied` or `ServiceUnavailable`
/// rather than guessing.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Always answers with the same coordinates (from config, or tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    coords: Coordinates,
}

impl FixedLocationProvider {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coords)
    }
}

/// The provider chosen for this machine: configured coordinates first,
/// then the platform location service.
#[derive(Debug, Clone)]
pub enum SystemLocationProvider {
    Fixed(FixedLocationProvider),
    #[cfg(target_os = "linux")]
    GeoClue(geoclue::GeoClueProvider),
    Unavailable,
}

impl SystemLocationProvider {
    pub fn detect(fixed: Option<(f64, f64)>, app_id: &str, timeout: Duration) -> Self {
        if let Some((lat, lon)) = fixed {
            tracing::info!("Using configured location {}, {}", lat, lon);
            return Self::Fixed(FixedLocationProvider::new(Coordinates::new(lat, lon)));
        }

        Self::platform(app_id, timeout)
    }

    #[cfg(target_os = "linux")]
    fn platform(app_id: &str, timeout: Duration) -> Self {
        Self::GeoClue(geoclue::GeoClueProvider::new(app_id, timeout))
    }

    #[cfg(not(target_os = "linux"))]
    fn platform(_app_id: &str, _timeout: Duration) -> Self {
        tracing::warn!("No system location service on this platform");
        Self::Unavailable
    }
}

impl LocationProvider for SystemLocationProvider {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Fixed(p) => p.current_location().await,
            #[cfg(target_os = "linux")]
            Self::GeoClue(p) => p.current_location().await,
            Self::Unavailable => Err(LocationError::ServiceUnavailable),
        }
    }
}

#[cfg(target_os = "linux")]
pub mod geoclue {
    //! GeoClue2 over the system D-Bus.

    use std::future::Future;
    use std::time::Duration;

    use zbus::zvariant::OwnedObjectPath;
    use zbus::{Connection, Proxy};

    use super::LocationProvider;
    use crate::types::{Coordinates, LocationError};

    const SERVICE: &str = "org.freedesktop.GeoClue2";
    const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
    const MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
    const CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
    const LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";

    /// GCLUE_ACCURACY_LEVEL_STREET_LEVEL
    const ACCURACY_STREET: u32 = 6;
    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    #[derive(Debug, Clone)]
    pub struct GeoClueProvider {
        desktop_id: String,
        timeout: Duration,
    }

    impl GeoClueProvider {
        pub fn new(desktop_id: &str, timeout: Duration) -> Self {
            Self {
                desktop_id: desktop_id.to_string(),
                timeout,
            }
        }

        async fn locate(&self) -> Result<Coordinates, LocationError> {
            let conn = Connection::system().await.map_err(|e| {
                tracing::debug!("System bus unavailable: {}", e);
                LocationError::ServiceUnavailable
            })?;

            let manager = Proxy::new(&conn, SERVICE, MANAGER_PATH, MANAGER_IFACE)
                .await
                .map_err(map_dbus_error)?;
            let client_path: OwnedObjectPath = manager
                .call("GetClient", &())
                .await
                .map_err(map_dbus_error)?;

            let client = Proxy::new(&conn, SERVICE, client_path.as_str(), CLIENT_IFACE)
                .await
                .map_err(map_dbus_error)?;
            client
                .set_property("DesktopId", self.desktop_id.as_str())
                .await
                .map_err(map_fdo_error)?;
            client
                .set_property("RequestedAccuracyLevel", ACCURACY_STREET)
                .await
                .map_err(map_fdo_error)?;

            let () = client.call("Start", &()).await.map_err(map_dbus_error)?;

            stopping_after(
                self.read_location(&conn, &client),
                client.call("Stop", &()),
            )
            .await
        }

        async fn read_location(
            &self,
            conn: &Connection,
            client: &Proxy<'_>,
        ) -> Result<Coordinates, LocationError> {
            let location_path = tokio::time::timeout(self.timeout, async {
                loop {
                    let path: OwnedObjectPath = client
                        .get_property("Location")
                        .await
                        .map_err(map_dbus_error)?;
                    if path.as_str() != "/" {
                        return Ok::<_, LocationError>(path);
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            })
            .await
            .map_err(|_| LocationError::Timeout)??;

            let location = Proxy::new(conn, SERVICE, location_path.as_str(), LOCATION_IFACE)
                .await
                .map_err(map_dbus_error)?;
            let latitude: f64 = location
                .get_property("Latitude")
                .await
                .map_err(map_dbus_error)?;
            let longitude: f64 = location
                .get_property("Longitude")
                .await
                .map_err(map_dbus_error)?;

            Ok(Coordinates::new(latitude, longitude))
        }
    }

    /// Await `work`, then `stop`, whatever `work` returned.
    async fn stopping_after<T, W, S>(work: W, stop: S) -> Result<T, LocationError>
    where
        W: Future<Output = Result<T, LocationError>>,
        S: Future<Output = zbus::Result<()>>,
    {
        let result = work.await;
        if let Err(e) = stop.await {
            tracing::debug!("GeoClue client did not stop cleanly: {}", e);
        }
        result
    }

    impl LocationProvider for GeoClueProvider {
        async fn current_location(&self) -> Result<Coordinates, LocationError> {
            let coords = self.locate().await?;
            tracing::info!("GeoClue location: {}", coords);
            Ok(coords)
        }
    }

    fn map_dbus_error(e: zbus::Error) -> LocationError {
        classify(&e.to_string())
    }

    fn map_fdo_error(e: zbus::fdo::Error) -> LocationError {
        classify(&e.to_string())
    }

    fn classify(message: &str) -> LocationError {
        if message.contains("AccessDenied") || message.contains("not allowed") {
            LocationError::PermissionDenied
        } else if message.contains("ServiceUnknown") || message.contains("NameHasNoOwner") {
            LocationError::ServiceUnavailable
        } else {
            LocationError::Other(message.to_string())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::atomic::{AtomicBool, Ordering};

        #[test]
        fn test_classify_access_denied() {
            assert!(matches!(
                classify("org.freedesktop.DBus.Error.AccessDenied: 'sips' disallowed"),
                LocationError::PermissionDenied
            ));
        }

        #[test]
        fn test_classify_missing_service() {
            assert!(matches!(
                classify("org.freedesktop.DBus.Error.ServiceUnknown: no such name"),
                LocationError::ServiceUnavailable
            ));
        }

        #[test]
        fn test_classify_other() {
            assert!(matches!(classify("boom"), LocationError::Other(_)));
        }

        #[tokio::test]
        async fn test_client_stopped_after_timeout() {
            let stopped = AtomicBool::new(false);

            let result: Result<Coordinates, _> = stopping_after(
                async { Err(LocationError::Timeout) },
                async {
                    stopped.store(true, Ordering::SeqCst);
                    Ok(())
                },
            )
            .await;

            assert!(matches!(result, Err(LocationError::Timeout)));
            assert!(stopped.load(Ordering::SeqCst));
        }

        #[tokio::test]
        async fn test_failed_stop_keeps_location() {
            let result = stopping_after(
                async { Ok(Coordinates::new(1.0, 2.0)) },
                async { Err(zbus::Error::Failure("busy".into())) },
            )
            .await;

            assert_eq!(result.unwrap(), Coordinates::new(1.0, 2.0));
        }
    }
}
