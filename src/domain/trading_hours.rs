//! Regular trading session window.

use chrono::NaiveTime;

// KRX regular session, inclusive of the closing auction print.
const OPEN_MINUTE: u32 = 9 * 60 + 5;
const CLOSE_MINUTE: u32 = 15 * 60 + 30;

/// Whether `time` falls inside the regular session (09:05-15:30 inclusive).
pub fn is_session_open(time: NaiveTime) -> bool {
    use chrono::Timelike;
    let minute = time.hour() * 60 + time.minute();
    (OPEN_MINUTE..=CLOSE_MINUTE).contains(&minute)
}
