//! Minute budget derived from the requested amount of available time.

/// Token meaning "the whole working day".
pub const FULL_DAY_TOKEN: &str = "full";
pub const FULL_DAY_MINUTES: u32 = 8 * 60;
/// Upper bound for any budget. Plans longer than the time left before
/// midnight still wrap around on the clock face.
pub const MAX_BUDGET_MINUTES: u32 = 24 * 60;
/// Used when the token carries no readable hour count.
pub const DEFAULT_BUDGET_MINUTES: u32 = 4 * 60;

/// Remaining schedulable minutes for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    total: u32,
    remaining: u32,
}

impl TimeBudget {
    pub fn new(total_minutes: u32) -> Self {
        Self {
            total: total_minutes,
            remaining: total_minutes,
        }
    }

    pub fn from_token(time_available: &str) -> Self {
        Self::new(to_minutes(time_available))
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consumes up to `minutes` and returns how many were actually taken.
    pub fn consume(&mut self, minutes: u32) -> u32 {
        let taken = minutes.min(self.remaining);
        self.remaining -= taken;
        taken
    }
}

/// Converts an "available time" token to minutes.
///
/// `"full"` is a full 8-hour day. Otherwise the leading digits are read as an
/// hour count, so `"3 hours"` is 180 and `"1.5"` is 60. Tokens without leading
/// digits resolve to a 4-hour budget instead of an error. Hour counts are
/// capped at [`MAX_BUDGET_MINUTES`], so a plan spans at most one day, though
/// its clock times wrap past midnight when it starts late enough.
pub fn to_minutes(time_available: &str) -> u32 {
    let token = time_available.trim();
    if token.eq_ignore_ascii_case(FULL_DAY_TOKEN) {
        return FULL_DAY_MINUTES;
    }

    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u32>()
        .ok()
        .map(|hours| hours.saturating_mul(60).min(MAX_BUDGET_MINUTES))
        .unwrap_or(DEFAULT_BUDGET_MINUTES)
}
