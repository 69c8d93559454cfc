use chrono::{NaiveTime, Timelike};
use tracing::{debug, info};

use crate::attendance::history::RecordEdit;
use crate::attendance::session::AttendanceSession;
use crate::error::EditError;
use crate::model::attendance::{AttendanceRecord, AttendanceType, RecordId};
use crate::model::user::User;
use crate::storage::KeyValueStorage;

pub const CONFIRM_EDIT_MESSAGE: &str = "Are you sure you want to update this attendance record?";

/// Values shown in the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub record_id: RecordId,
    /// Read-only `dd/MM/yyyy` of the original record.
    pub date_label: String,
    pub hour: u32,
    pub minute: u32,
    pub kind: AttendanceType,
}

impl EditDraft {
    /// `HH:mm`
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// Question the host must put to the user before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub record_id: RecordId,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

#[derive(Debug)]
pub enum EditResolution {
    /// No save was requested.
    NothingPending,
    /// Draft stays open, nothing changed.
    Declined,
    Applied(AttendanceRecord),
    /// Draft stays open so the user can correct it.
    Failed(EditError),
}

/// Admin edit dialog: open → adjust → request save → resolve confirmation.
#[derive(Debug, Default)]
pub struct EditController {
    draft: Option<EditDraft>,
    awaiting_confirmation: bool,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    /// Inert for non-admin users. Returns whether a draft was opened.
    pub fn open(&mut self, user: &User, record: &AttendanceRecord) -> bool {
        if !user.can_edit_records() {
            debug!(user = %user.id, "Edit ignored for non-admin user");
            return false;
        }

        let local = record.local_time();
        self.draft = Some(EditDraft {
            record_id: record.id.clone(),
            date_label: local.format("%d/%m/%Y").to_string(),
            hour: local.hour(),
            minute: local.minute(),
            kind: record.kind,
        });
        self.awaiting_confirmation = false;
        true
    }

    pub fn set_time(&mut self, hour: u32, minute: u32) -> Result<(), EditError> {
        if hour > 23 || minute > 59 {
            return Err(EditError::InvalidTime { hour, minute });
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.hour = hour;
            draft.minute = minute;
        }
        Ok(())
    }

    /// Accepts the `HH:mm` value of a time input.
    pub fn set_time_str(&mut self, value: &str) -> Result<(), EditError> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map_err(|_| EditError::UnparseableTime(value.to_string()))?;
        self.set_time(time.hour(), time.minute())
    }

    pub fn set_kind(&mut self, kind: AttendanceType) {
        if let Some(draft) = self.draft.as_mut() {
            draft.kind = kind;
        }
    }

    /// `None` when no record is targeted.
    pub fn request_save(&mut self) -> Option<ConfirmationPrompt> {
        let draft = self.draft.as_ref()?;
        self.awaiting_confirmation = true;
        Some(ConfirmationPrompt {
            record_id: draft.record_id.clone(),
            message: CONFIRM_EDIT_MESSAGE,
        })
    }

    pub fn resolve<S: KeyValueStorage>(
        &mut self,
        decision: Confirmation,
        session: &mut AttendanceSession<S>,
    ) -> EditResolution {
        if !self.awaiting_confirmation {
            return EditResolution::NothingPending;
        }
        self.awaiting_confirmation = false;

        let Some(draft) = self.draft.as_ref() else {
            return EditResolution::NothingPending;
        };

        if decision == Confirmation::Declined {
            debug!(record_id = %draft.record_id, "Edit declined");
            return EditResolution::Declined;
        }

        let edit = RecordEdit {
            record_id: draft.record_id.clone(),
            hour: draft.hour,
            minute: draft.minute,
            kind: draft.kind,
        };

        match session.commit_edit(&edit) {
            Ok(updated) => {
                info!(record_id = %updated.id, "Edit applied");
                self.draft = None;
                EditResolution::Applied(updated)
            }
            Err(e) => EditResolution::Failed(e),
        }
    }

    pub fn close(&mut self) {
        self.draft = None;
        self.awaiting_confirmation = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::session::SessionSettings;
    use crate::camera::CapturedPhoto;
    use crate::clock::Clock;
    use crate::model::attendance::Coordinates;
    use crate::model::role::Role;
    use crate::model::user::sample_user;
    use crate::storage::MemoryStorage;
    use crate::storage::record_store::RecordStore;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn morning() -> i64 {
        Local
            .with_ymd_and_hms(2024, 1, 9, 8, 12, 0)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    fn session_with_record(role: Role) -> (AttendanceSession<MemoryStorage>, AttendanceRecord) {
        let mut session = AttendanceSession::open(
            sample_user(role),
            RecordStore::new(MemoryStorage::new()),
            Arc::new(FixedClock(morning())),
            SessionSettings::default(),
        );
        session.apply_location(Ok(Coordinates::new(10.0, 106.0, 5.0)));
        session.capture_photo(CapturedPhoto::new("data:image/jpeg;base64,AAAA").unwrap());
        let pending = session.begin_submit().unwrap();
        let record = session.complete_submit(pending).record;
        (session, record)
    }

    #[test]
    fn non_admin_open_is_inert() {
        let (mut session, record) = session_with_record(Role::Employee);
        let before = session.records().to_vec();
        let mut editor = EditController::new();

        assert!(!editor.open(session.profile(), &record));
        assert!(editor.draft().is_none());
        assert!(editor.request_save().is_none());
        assert!(matches!(
            editor.resolve(Confirmation::Accepted, &mut session),
            EditResolution::NothingPending
        ));
        assert_eq!(session.records(), before.as_slice());
    }

    #[test]
    fn open_prefills_from_record() {
        let (session, record) = session_with_record(Role::Admin);
        let mut editor = EditController::new();

        assert!(editor.open(session.profile(), &record));
        let draft = editor.draft().unwrap();
        assert_eq!(draft.time_label(), "08:12");
        assert_eq!(draft.date_label, "09/01/2024");
        assert_eq!(draft.kind, AttendanceType::CheckIn);
    }

    #[test]
    fn declined_confirmation_changes_nothing_and_keeps_draft() {
        let (mut session, record) = session_with_record(Role::Admin);
        let mut editor = EditController::new();
        editor.open(session.profile(), &record);
        editor.set_time_str("07:45").unwrap();

        let prompt = editor.request_save().unwrap();
        assert_eq!(prompt.message, CONFIRM_EDIT_MESSAGE);

        assert!(matches!(
            editor.resolve(Confirmation::Declined, &mut session),
            EditResolution::Declined
        ));
        assert_eq!(session.records()[0], record);
        assert!(editor.draft().is_some());
        assert!(!editor.is_awaiting_confirmation());
    }

    #[test]
    fn accepted_confirmation_applies_and_persists() {
        let (mut session, record) = session_with_record(Role::Admin);
        let mut editor = EditController::new();
        editor.open(session.profile(), &record);
        editor.set_time(7, 45).unwrap();
        editor.set_kind(AttendanceType::CheckOut);
        editor.request_save().unwrap();

        let EditResolution::Applied(updated) = editor.resolve(Confirmation::Accepted, &mut session)
        else {
            panic!("edit was not applied");
        };

        let local = updated.local_time();
        assert_eq!((local.hour(), local.minute()), (7, 45));
        assert_eq!(local.format("%Y-%m-%d").to_string(), "2024-01-09");
        assert_eq!(updated.kind, AttendanceType::CheckOut);
        assert!(editor.draft().is_none());

        let persisted = session.store().load().unwrap();
        assert_eq!(persisted[0], updated);
    }

    #[test]
    fn resolve_without_request_is_noop() {
        let (mut session, record) = session_with_record(Role::Admin);
        let mut editor = EditController::new();
        editor.open(session.profile(), &record);
        editor.set_time(6, 0).unwrap();

        assert!(matches!(
            editor.resolve(Confirmation::Accepted, &mut session),
            EditResolution::NothingPending
        ));
        assert_eq!(session.records()[0], record);
    }

    #[test]
    fn rejects_bad_time_input() {
        let mut editor = EditController::new();
        assert!(matches!(
            editor.set_time_str("25:00"),
            Err(EditError::UnparseableTime(_))
        ));
        assert!(matches!(
            editor.set_time(12, 75),
            Err(EditError::InvalidTime { .. })
        ));
    }
}
