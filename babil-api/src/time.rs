use crate::Time;

/// Units of a relative timestamp, from the largest down
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    const ALL: [TimeUnit; 7] = [
        TimeUnit::Years,
        TimeUnit::Months,
        TimeUnit::Weeks,
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    pub fn seconds(self) -> i64 {
        match self {
            TimeUnit::Years => 31_536_000,
            TimeUnit::Months => 2_592_000,
            TimeUnit::Weeks => 604_800,
            TimeUnit::Days => 86_400,
            TimeUnit::Hours => 3_600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }

    pub fn label(self, n: i64) -> &'static str {
        match self {
            TimeUnit::Years if n == 1 => "an",
            TimeUnit::Years => "ans",
            TimeUnit::Months => "mois",
            TimeUnit::Weeks => "sem",
            TimeUnit::Days => "j",
            TimeUnit::Hours => "h",
            TimeUnit::Minutes => "min",
            TimeUnit::Seconds => "sec",
        }
    }

    /// Largest unit that fits at least once in `elapsed` seconds
    pub fn for_elapsed(elapsed: i64) -> TimeUnit {
        TimeUnit::ALL
            .into_iter()
            .find(|u| elapsed >= u.seconds())
            .unwrap_or(TimeUnit::Seconds)
    }
}

/// Renders how long ago `created_at` was, in a single unit, eg. `3 h`
///
/// A `created_at` later than `now` counts as zero seconds ago.
pub fn time_ago(created_at: Time, now: Time) -> String {
    let elapsed = (now - created_at).num_seconds().max(0);
    let unit = TimeUnit::for_elapsed(elapsed);
    let n = elapsed / unit.seconds();
    format!("{n} {}", unit.label(n))
}
