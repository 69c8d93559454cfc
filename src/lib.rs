//! Attendance check-in/check-out core: derives the next action from the local
//! record history, gates submissions on location and selfie, persists the
//! history to key-value storage, groups it by day, applies admin edits and
//! asks a hosted model for a short attendance report.

pub mod attendance;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod model;
pub mod report;
pub mod storage;

pub use attendance::editor::{Confirmation, ConfirmationPrompt, EditController, EditResolution};
pub use attendance::gate::{Gate, SubmitBlocked};
pub use attendance::history::{DayGroup, RecordEdit, group_by_day};
pub use attendance::session::{AttendanceSession, SessionSettings, SubmitReceipt};
pub use attendance::state::AttendanceState;
pub use config::Config;
pub use model::attendance::{AttendanceRecord, AttendanceType, Coordinates, RecordId};
pub use model::role::Role;
pub use model::user::User;
pub use report::{Report, ReportService, Summarizer};
pub use storage::record_store::RecordStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
