//! Hard limits on engine inputs. Violations surface as `InvalidRequest`.

/// Longest service a single appointment may occupy, including buffer.
pub const MAX_SERVICE_DURATION_MINUTES: i64 = 24 * 60;

/// How far into the future an appointment may be booked.
pub const MAX_ADVANCE_DAYS: i64 = 90;

pub const MAX_NOTES_LEN: usize = 2_000;

pub const MAX_REASON_LEN: usize = 500;

/// Widest window accepted by range listings when both bounds are given.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 366;
