//! Consecutive-day workout streaks
//!
//! A streak counts the days with at least one logged session, walking back
//! from a reference day. One missed day is forgiven per streak: the first gap
//! met while scanning backwards is spent as a rest day, any later gap ends
//! the streak.
//!
//! When the rest day is spent on a workout one day before the expected day,
//! the next expected day becomes the day before *that workout*. The skipped
//! day is not looked back over again.

use chrono::NaiveDate;

/// Deduplicate session dates and order them most recent first
pub fn distinct_dates_desc<I>(dates: I) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

/// Compute the current streak ending at `reference_date`
///
/// `session_dates` must be distinct and sorted descending, as produced by
/// [`distinct_dates_desc`]. The scan starts at `reference_date` whether or
/// not a session exists on that day, so a missing "today" can itself be the
/// rest day.
pub fn compute_streak(session_dates: &[NaiveDate], reference_date: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut expected = reference_date;
    let mut rest_used = false;

    for &date in session_dates {
        let diff_days = (expected - date).num_days();

        let next_expected = if diff_days == 0 {
            expected.pred_opt()
        } else if diff_days == 1 && !rest_used {
            rest_used = true;
            date.pred_opt()
        } else {
            break;
        };

        streak += 1;
        match next_expected {
            Some(day) => expected = day,
            None => break,
        }
    }

    streak
}
