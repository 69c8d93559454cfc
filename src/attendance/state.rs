use crate::model::attendance::{AttendanceRecord, AttendanceType};

/// Check-in status derived from the head of the newest-first record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    NotCheckedIn,
    CheckedIn,
}

impl AttendanceState {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        match records.first() {
            Some(latest) if latest.kind == AttendanceType::CheckIn => AttendanceState::CheckedIn,
            _ => AttendanceState::NotCheckedIn,
        }
    }

    pub fn is_checked_in(self) -> bool {
        self == AttendanceState::CheckedIn
    }

    /// Type of the record the next submission creates.
    pub fn next_action(self) -> AttendanceType {
        match self {
            AttendanceState::NotCheckedIn => AttendanceType::CheckIn,
            AttendanceState::CheckedIn => AttendanceType::CheckOut,
        }
    }

    /// Badge text on the profile card.
    pub fn label(self) -> &'static str {
        match self {
            AttendanceState::NotCheckedIn => "Not checked in",
            AttendanceState::CheckedIn => "Working",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::Coordinates;

    fn record(kind: AttendanceType, timestamp: i64) -> AttendanceRecord {
        AttendanceRecord::new(kind, timestamp, Coordinates::new(0.0, 0.0, 1.0), String::new())
    }

    #[test]
    fn empty_list_is_not_checked_in() {
        let state = AttendanceState::from_records(&[]);
        assert_eq!(state, AttendanceState::NotCheckedIn);
        assert_eq!(state.next_action(), AttendanceType::CheckIn);
    }

    #[test]
    fn head_decides_regardless_of_older_records() {
        let records = vec![
            record(AttendanceType::CheckIn, 3),
            record(AttendanceType::CheckIn, 2),
            record(AttendanceType::CheckOut, 1),
        ];
        assert!(AttendanceState::from_records(&records).is_checked_in());

        let records = vec![
            record(AttendanceType::CheckOut, 3),
            record(AttendanceType::CheckIn, 2),
        ];
        let state = AttendanceState::from_records(&records);
        assert_eq!(state, AttendanceState::NotCheckedIn);
        assert_eq!(state.next_action(), AttendanceType::CheckIn);
    }

    #[test]
    fn labels() {
        assert_eq!(AttendanceState::CheckedIn.label(), "Working");
        assert_eq!(AttendanceState::NotCheckedIn.label(), "Not checked in");
    }
}
