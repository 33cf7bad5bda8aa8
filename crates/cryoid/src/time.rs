use std::time::{SystemTime, UNIX_EPOCH};

/// Millennium epoch: Saturday, January 1, 2000 00:00:00 UTC.
///
/// The historical default for the fixed-layout variant.
pub const MILLENNIUM_EPOCH: u64 = 946_684_800_000;

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC.
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC.
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction lets generators take the real system clock in production
/// and a fixed or stepped clock in tests.
///
/// # Example
///
/// ```
/// use cryoid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// The system wall clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX epoch")
            .as_millis() as u64
    }
}
