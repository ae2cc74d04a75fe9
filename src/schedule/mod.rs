mod error;
mod gesture;
mod interval;
mod merge;
mod overlap;
mod state;
mod sync;
mod time;
mod week;

#[cfg(test)]
mod tests;

pub use error::ScheduleError;
pub use gesture::{EditForm, EditPreview, Editor, Interaction, PreviewKind, PreviewSegment};
pub use interval::{
    DraftId, ExceptionKind, ExceptionMode, Interval, Shift, ShiftException, ShiftKind, Source,
    VacationDay, VacationRemoval, VacationScope, Validity,
};
pub use merge::{merge, merge_blocks, merge_with, total_minutes, Block, Run};
pub use overlap::{find_overlap, has_overlap, overlaps, validate_proposal};
pub use state::{
    PendingChanges, SavedWeek, ScheduleState, ScheduleStatus, ViewBlock, WeekSwitch,
    MAX_VACATION_RANGE_DAYS,
};
pub use sync::{
    commit, fetch_saved, CommitPlan, CommitReport, NewShift, ScheduleApi, SyncError, SyncStep,
};
pub use time::{
    duration_minutes, effective_end, minutes_to_time, time_to_minutes, TimeOfDay, Weekday,
    MINUTES_PER_DAY,
};
pub use week::{week_start, Week};
