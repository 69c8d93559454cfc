use std::collections::BTreeMap;

use chrono::{Local, LocalResult, NaiveTime, TimeZone, Timelike};

use crate::error::EditError;
use crate::model::attendance::{
    AttendanceRecord, AttendanceType, RecordId, local_datetime, sort_newest_first,
};

/// Local calendar date of a timestamp as a fixed-width `YYYY-MM-DD` key.
pub fn date_key(timestamp: i64) -> String {
    local_datetime(timestamp).format("%Y-%m-%d").to_string()
}

/// Records sharing one local calendar date. Display only.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date_key: String,
    /// Earliest event of the day first.
    pub records: Vec<&'a AttendanceRecord>,
}

impl DayGroup<'_> {
    /// `dd/MM/yyyy` header text, taken from the group's first record.
    pub fn display_date(&self) -> String {
        self.records
            .first()
            .map(|r| r.local_time().format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    }
}

/// Groups by day. Days are ordered by descending string comparison of their keys,
/// records inside a day by ascending timestamp.
pub fn group_by_day(records: &[AttendanceRecord]) -> Vec<DayGroup<'_>> {
    let mut days: BTreeMap<String, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        days.entry(date_key(record.timestamp)).or_default().push(record);
    }

    days.into_iter()
        .rev()
        .map(|(date_key, mut records)| {
            records.sort_by_key(|r| r.timestamp);
            DayGroup { date_key, records }
        })
        .collect()
}

/// Admin correction of one record: new time of day and type, same date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEdit {
    pub record_id: RecordId,
    pub hour: u32,
    pub minute: u32,
    pub kind: AttendanceType,
}

/// Replaces hour and minute of `timestamp` in local time. Date, seconds and
/// milliseconds are kept.
pub fn retime(timestamp: i64, hour: u32, minute: u32) -> Result<i64, EditError> {
    let original = local_datetime(timestamp).naive_local();
    let time = NaiveTime::from_hms_nano_opt(hour, minute, original.second(), original.nanosecond())
        .ok_or(EditError::InvalidTime { hour, minute })?;
    let edited = original.date().and_time(time);

    match Local.from_local_datetime(&edited) {
        LocalResult::Single(dt) => Ok(dt.timestamp_millis()),
        // DST fold: first occurrence
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp_millis()),
        LocalResult::None => Err(EditError::NonexistentLocalTime(
            edited.format("%Y-%m-%d %H:%M").to_string(),
        )),
    }
}

/// Applies `edit` and re-sorts the whole master list newest-first.
pub fn apply_edit(
    records: &mut Vec<AttendanceRecord>,
    edit: &RecordEdit,
) -> Result<AttendanceRecord, EditError> {
    let target = records
        .iter_mut()
        .find(|r| r.id == edit.record_id)
        .ok_or_else(|| EditError::RecordNotFound(edit.record_id.to_string()))?;

    target.timestamp = retime(target.timestamp, edit.hour, edit.minute)?;
    target.kind = edit.kind;
    let updated = target.clone();

    sort_newest_first(records);
    Ok(updated)
}
