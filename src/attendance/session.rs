use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::attendance::gate::{Gate, SubmitBlocked};
use crate::attendance::history::{RecordEdit, apply_edit};
use crate::attendance::state::AttendanceState;
use crate::camera::{CameraProvider, CaptureSettings, CapturedPhoto};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{EditError, LocationError};
use crate::location::{LocationOptions, LocationProvider, LocationStatus, fetch_once};
use crate::model::attendance::{
    AttendanceRecord, AttendanceType, Coordinates, sort_newest_first,
};
use crate::model::user::User;
use crate::storage::KeyValueStorage;
use crate::storage::record_store::RecordStore;

/// Timing knobs of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Artificial latency before a submission is committed.
    pub submit_delay: Duration,
    /// How long the success notice stays up before `expire_success` dismisses it.
    pub success_display: Duration,
    pub location: LocationOptions,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(1500),
            success_display: Duration::from_millis(2000),
            location: LocationOptions::default(),
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            submit_delay: config.submit_delay,
            success_display: config.success_display,
            location: LocationOptions::fresh_fix(config.location_timeout),
        }
    }
}

/// Inputs snapshotted by `begin_submit`, committed by `complete_submit`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub kind: AttendanceType,
    coordinates: Coordinates,
    photo_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub record: AttendanceRecord,
    /// False when the record is kept in memory but the storage write failed.
    pub persisted: bool,
}

/// Transient confirmation raised after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessNotice {
    pub kind: AttendanceType,
}

impl SuccessNotice {
    pub fn message(&self) -> &'static str {
        match self.kind {
            AttendanceType::CheckIn => "Your check-in time has been recorded.",
            AttendanceType::CheckOut => "Your check-out time has been recorded.",
        }
    }
}

/// Clears the busy flag when the delay in `submit` ends or is dropped.
struct BusyGuard<'a>(&'a mut bool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Local attendance flow for one user. The record list (newest first) is the
/// single source of truth for the check-in state.
pub struct AttendanceSession<S: KeyValueStorage> {
    profile: User,
    store: RecordStore<S>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
    records: Vec<AttendanceRecord>,
    location: LocationStatus,
    photo: Option<CapturedPhoto>,
    submitting: bool,
    success: Option<SuccessNotice>,
}

impl<S: KeyValueStorage> AttendanceSession<S> {
    /// Loads the persisted history. Unreadable content starts an empty history.
    /// Location starts as `Loading`; the host issues the first fetch.
    #[instrument(name = "session_open", skip_all, fields(user = %profile.id))]
    pub fn open(
        profile: User,
        store: RecordStore<S>,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
    ) -> Self {
        let mut records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Failed to load attendance history, starting empty");
                Vec::new()
            }
        };
        sort_newest_first(&mut records);

        info!(count = records.len(), "Attendance session opened");

        Self {
            profile,
            store,
            clock,
            settings,
            records,
            location: LocationStatus::Loading,
            photo: None,
            submitting: false,
            success: None,
        }
    }

    pub fn profile(&self) -> &User {
        &self.profile
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Newest first.
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&AttendanceRecord> {
        self.records.first()
    }

    pub fn state(&self) -> AttendanceState {
        AttendanceState::from_records(&self.records)
    }

    pub fn is_checked_in(&self) -> bool {
        self.state().is_checked_in()
    }

    // ---- location ----

    pub fn location(&self) -> &LocationStatus {
        &self.location
    }

    /// Marks location as loading and returns the options for the one-shot request.
    pub fn begin_location_fetch(&mut self) -> LocationOptions {
        self.location = LocationStatus::Loading;
        self.settings.location
    }

    /// Applies a fetch result. A failure drops any earlier fix.
    pub fn apply_location(&mut self, result: Result<Coordinates, LocationError>) {
        self.location = match result {
            Ok(coords) => {
                debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    accuracy = coords.accuracy,
                    "Location acquired"
                );
                LocationStatus::Known(coords)
            }
            Err(e) => {
                warn!(error = %e, "Location unavailable");
                LocationStatus::Unavailable(e)
            }
        };
    }

    /// One request, no automatic retry. Calling it again is the manual retry.
    pub async fn refresh_location(&mut self, provider: &dyn LocationProvider) -> &LocationStatus {
        let options = self.begin_location_fetch();
        let result = fetch_once(provider, options).await;
        self.apply_location(result);
        &self.location
    }

    // ---- photo ----

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    pub fn capture_photo(&mut self, photo: CapturedPhoto) {
        self.photo = Some(photo);
    }

    pub fn retake_photo(&mut self) {
        self.photo = None;
    }

    /// Asks the host camera for a selfie; keeps the current photo when nothing is captured.
    pub async fn capture_with(&mut self, camera: &dyn CameraProvider) -> bool {
        match camera.capture(CaptureSettings::default()).await {
            Some(photo) => {
                self.capture_photo(photo);
                true
            }
            None => false,
        }
    }

    // ---- submission ----

    pub fn gate(&self) -> Gate {
        Gate {
            location_known: self.location.coordinates().is_some(),
            location_loading: self.location.is_loading(),
            submitting: self.submitting,
            checked_in: self.is_checked_in(),
            photo_captured: self.photo.is_some(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.gate().can_submit()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates the gate, marks the session busy and snapshots location and photo.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        if let Some(blocked) = self.gate().blocker() {
            debug!(?blocked, "Submission blocked");
            return Err(blocked);
        }

        let coordinates = self
            .location
            .coordinates()
            .ok_or(SubmitBlocked::LocationUnavailable)?;
        let kind = self.state().next_action();

        // check-out may run without a fresh capture and reuses the latest photo
        let photo_url = match &self.photo {
            Some(photo) => photo.as_str().to_string(),
            None => self
                .latest()
                .map(|r| r.photo_url.clone())
                .unwrap_or_default(),
        };

        self.submitting = true;
        Ok(PendingSubmission {
            kind,
            coordinates,
            photo_url,
        })
    }

    /// Creates the record, inserts it newest-first and persists the full list.
    /// An edited record timed later than now keeps its place at the head.
    pub fn complete_submit(&mut self, pending: PendingSubmission) -> SubmitReceipt {
        let record = AttendanceRecord::new(
            pending.kind,
            self.clock.now_millis(),
            pending.coordinates,
            pending.photo_url,
        );

        self.records.insert(0, record.clone());
        sort_newest_first(&mut self.records);
        let persisted = self.persist();

        self.submitting = false;
        self.success = Some(SuccessNotice { kind: record.kind });

        info!(
            record_id = %record.id,
            kind = %record.kind,
            timestamp = record.timestamp,
            "Attendance recorded"
        );

        SubmitReceipt { record, persisted }
    }

    /// Abandons a pending submission and reopens the gate.
    pub fn cancel_submit(&mut self, pending: PendingSubmission) {
        debug!(kind = %pending.kind, "Submission cancelled");
        self.submitting = false;
    }

    /// `begin_submit`, the configured delay, then `complete_submit`. Dropping
    /// the future during the delay leaves nothing recorded and the gate open.
    pub async fn submit(&mut self) -> Result<SubmitReceipt, SubmitBlocked> {
        let pending = self.begin_submit()?;
        let delay = self.settings.submit_delay;
        {
            let _busy = BusyGuard(&mut self.submitting);
            tokio::time::sleep(delay).await;
        }
        Ok(self.complete_submit(pending))
    }

    pub fn success_notice(&self) -> Option<SuccessNotice> {
        self.success
    }

    /// Hides the notice and drops the held photo so the next check-in needs a new capture.
    pub fn dismiss_success(&mut self) {
        if self.success.take().is_some() {
            self.photo = None;
        }
    }

    /// Waits `success_display`, then dismisses the notice.
    pub async fn expire_success(&mut self) {
        if self.success.is_none() {
            return;
        }
        tokio::time::sleep(self.settings.success_display).await;
        self.dismiss_success();
    }

    // ---- edits ----

    /// Applies an admin edit and persists the re-sorted list.
    pub fn commit_edit(&mut self, edit: &RecordEdit) -> Result<AttendanceRecord, EditError> {
        if !self.profile.can_edit_records() {
            return Err(EditError::NotPermitted);
        }

        let snapshot = self.records.clone();
        let updated = apply_edit(&mut self.records, edit)?;
        if let Err(e) = self.store.save_all(&self.records) {
            error!(error = %e, record_id = %edit.record_id, "Failed to persist edit, rolled back");
            self.records = snapshot;
            return Err(e.into());
        }

        info!(
            record_id = %updated.id,
            kind = %updated.kind,
            timestamp = updated.timestamp,
            "Attendance record edited"
        );
        Ok(updated)
    }

    fn persist(&mut self) -> bool {
        match self.store.save_all(&self.records) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to persist attendance records");
                false
            }
        }
    }
}
