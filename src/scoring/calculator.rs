use chrono::NaiveDate;

use crate::models::{Difficulty, TaskStatus};
use crate::scoring::multiplier;

/// Base point unit; scaled by difficulty weight.
pub const BASE_UNIT: i64 = 10;

/// Base score before any timing effect. Difficulty is the only input:
/// easy 10, medium 20, hard 30. Priority orders work but does not pay.
pub fn base_score(difficulty: Difficulty) -> i64 {
    BASE_UNIT * difficulty.weight()
}

/// Current point value of a task.
///
/// While the task is not done, the stored score stands unchanged: timing only
/// matters at completion. When the task is done, the base score is scaled by
/// the due-date multiplier using `today` as the completion date.
pub fn compute_score(
    difficulty: Difficulty,
    due_date: Option<&str>,
    status: &TaskStatus,
    stored_score: i64,
    today: NaiveDate,
) -> i64 {
    if *status != TaskStatus::Done {
        return stored_score;
    }
    let base = base_score(difficulty);
    multiplier::apply(base, multiplier::due_date_multiplier(due_date, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn base_scores_follow_difficulty() {
        assert_eq!(base_score(Difficulty::Easy), 10);
        assert_eq!(base_score(Difficulty::Medium), 20);
        assert_eq!(base_score(Difficulty::Hard), 30);
    }

    #[test]
    fn not_done_returns_stored_score() {
        for status in [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Review,
        ] {
            assert_eq!(
                compute_score(Difficulty::Hard, Some("2020-01-01"), &status, 42, today()),
                42
            );
        }
    }

    #[test]
    fn done_without_due_date_is_base() {
        assert_eq!(
            compute_score(Difficulty::Medium, None, &TaskStatus::Done, 0, today()),
            20
        );
    }

    #[test]
    fn done_on_time_gets_completion_bonus() {
        assert_eq!(
            compute_score(Difficulty::Medium, Some("2026-01-15"), &TaskStatus::Done, 0, today()),
            25
        );
    }

    #[test]
    fn done_late_is_penalized_but_never_below_zero() {
        let late = compute_score(
            Difficulty::Easy,
            Some("2020-01-01"),
            &TaskStatus::Done,
            0,
            today(),
        );
        // Deeply late converges to the 0.5x floor.
        assert_eq!(late, 5);
    }

    #[test]
    fn bad_due_date_falls_back_to_base() {
        assert_eq!(
            compute_score(Difficulty::Hard, Some("soonish"), &TaskStatus::Done, 0, today()),
            30
        );
    }
}
