//! Ordering of a dining hall's meals for display
//!
//! When today's opening hours carry an interval for every meal, meals are
//! ordered by when they start and the one happening now (or next) is
//! selected. Otherwise a fixed breakfast-to-late-night ranking is used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rank for names not in the fixed table
const OTHER_PRIORITY: u8 = 5;

fn meal_priority(name: &str) -> u8 {
    match name.trim().to_lowercase().as_str() {
        "breakfast" => 0,
        "brunch" => 1,
        "lunch" => 2,
        "dinner" => 3,
        "late night" => 4,
        _ => OTHER_PRIORITY,
    }
}

/// One opening interval from today's hours; `note` names the meal it serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealHours {
    pub note: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MealHours {
    fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    fn serves(&self, meal: &str) -> bool {
        self.note.as_deref() == Some(meal)
    }
}

/// Ordered meal names and the index to show first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MealSchedule {
    pub names: Vec<String>,
    pub current_index: usize,
}

/// Order `meals` for display at `now`.
pub fn order_meals<S: AsRef<str>>(meals: &[S], hours: &[MealHours], now: DateTime<Utc>) -> MealSchedule {
    if meals.is_empty() {
        return MealSchedule::default();
    }

    if let Some(mut timed) = meal_intervals(meals, hours) {
        timed.sort_by_key(|(_, interval)| interval.start);
        let current_index = timed
            .iter()
            .position(|(_, interval)| interval.contains(now) || interval.start > now)
            .unwrap_or(0);

        return MealSchedule {
            names: timed.into_iter().map(|(name, _)| name.to_string()).collect(),
            current_index,
        };
    }

    let mut names: Vec<String> = meals.iter().map(|m| m.as_ref().to_string()).collect();
    names.sort_by_key(|name| meal_priority(name));
    MealSchedule { names, current_index: 0 }
}

/// Pair every meal with its interval, or `None` if any meal has no hours.
///
/// Notes must equal the meal name exactly; a later interval with the same
/// note overrides an earlier one.
fn meal_intervals<'a, S: AsRef<str>>(
    meals: &'a [S],
    hours: &'a [MealHours],
) -> Option<Vec<(&'a str, &'a MealHours)>> {
    meals
        .iter()
        .map(|meal| {
            let meal = meal.as_ref();
            hours.iter().rev().find(|h| h.serves(meal)).map(|interval| (meal, interval))
        })
        .collect()
}
