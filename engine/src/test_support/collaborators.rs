//! Recording and in-memory collaborators.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use url::Url;

use crate::domain::location::{LocationRecord, SaveLocationRequest};
use crate::domain::ports::{
    AuthSession, LocationRepository, LocationRepositoryError, NavigationLauncher, Notification,
    NotificationSink,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sign-in predicate that can be flipped at runtime.
#[derive(Debug, Default)]
pub struct StaticAuthSession(AtomicBool);

impl StaticAuthSession {
    /// Session with a user signed in.
    pub const fn signed_in() -> Self {
        Self(AtomicBool::new(true))
    }

    /// Session with nobody signed in.
    pub const fn signed_out() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Change the signed-in state.
    pub fn set(&self, authenticated: bool) {
        self.0.store(authenticated, Ordering::SeqCst);
    }
}

impl AuthSession for StaticAuthSession {
    fn is_authenticated(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Notification sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingNotificationSink(Mutex<Vec<Notification>>);

impl RecordingNotificationSink {
    /// Notifications received so far.
    pub fn received(&self) -> Vec<Notification> {
        lock(&self.0).clone()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) {
        lock(&self.0).push(notification);
    }
}

/// Navigation launcher that keeps every opened URL.
#[derive(Debug, Default)]
pub struct RecordingNavigationLauncher(Mutex<Vec<Url>>);

impl RecordingNavigationLauncher {
    /// URLs opened so far.
    pub fn opened(&self) -> Vec<Url> {
        lock(&self.0).clone()
    }
}

impl NavigationLauncher for RecordingNavigationLauncher {
    fn open_external(&self, url: &Url) {
        lock(&self.0).push(url.clone());
    }
}

/// Location backend kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryLocationRepository {
    records: Mutex<Vec<LocationRecord>>,
    save_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fail_saves: Mutex<Option<LocationRepositoryError>>,
    fail_lists: Mutex<Option<LocationRepositoryError>>,
}

impl InMemoryLocationRepository {
    /// Backend pre-loaded with `records`.
    pub fn with_records(records: Vec<LocationRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make every future save fail with `error`.
    pub fn fail_saves_with(&self, error: LocationRepositoryError) {
        *lock(&self.fail_saves) = Some(error);
    }

    /// Make every future listing fail with `error`.
    pub fn fail_lists_with(&self, error: LocationRepositoryError) {
        *lock(&self.fail_lists) = Some(error);
    }

    /// Stored records.
    pub fn stored(&self) -> Vec<LocationRecord> {
        lock(&self.records).clone()
    }

    /// Number of save calls received.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Number of list calls received.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn get_all_locations(&self) -> Result<Vec<LocationRecord>, LocationRepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.fail_lists).clone() {
            return Err(error);
        }
        Ok(self.stored())
    }

    async fn save_location(
        &self,
        request: &SaveLocationRequest,
    ) -> Result<LocationRecord, LocationRepositoryError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.fail_saves).clone() {
            return Err(error);
        }
        let record = LocationRecord::from(request.clone());
        lock(&self.records).push(record.clone());
        Ok(record)
    }
}
