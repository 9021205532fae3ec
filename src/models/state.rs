//! NFL calendar state
//!
//! `/state/{sport}` reports the current season and week; it is what lets
//! the client decide whether a week is still being scored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cache::TtlContext;
use crate::models::{require_season, Payload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NflState {
    pub week: u32,
    pub season: String,
    /// `pre`, `regular`, `post` or `off`
    pub season_type: String,
    #[serde(default)]
    pub display_week: Option<u32>,
    #[serde(default)]
    pub leg: Option<u32>,
    #[serde(default)]
    pub previous_season: Option<String>,
    #[serde(default)]
    pub season_start_date: Option<NaiveDate>,
}

// == Week Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    Completed,
    Live,
    Upcoming,
}

impl WeekStatus {
    /// Live and upcoming weeks can still change, so both get the short TTL.
    pub fn ttl_context(self) -> TtlContext {
        TtlContext {
            live_week: !matches!(self, WeekStatus::Completed),
        }
    }
}

impl NflState {
    pub fn is_scoring_period(&self) -> bool {
        matches!(self.season_type.as_str(), "regular" | "post")
    }

    /// Where `week` of `season` sits relative to the current NFL calendar.
    pub fn week_status(&self, season: &str, week: u32) -> WeekStatus {
        // Four-digit seasons compare correctly as strings
        match season.cmp(self.season.as_str()) {
            std::cmp::Ordering::Less => WeekStatus::Completed,
            std::cmp::Ordering::Greater => WeekStatus::Upcoming,
            std::cmp::Ordering::Equal if !self.is_scoring_period() => {
                if self.season_type == "pre" {
                    WeekStatus::Upcoming
                } else {
                    WeekStatus::Completed
                }
            }
            std::cmp::Ordering::Equal => match week.cmp(&self.week) {
                std::cmp::Ordering::Less => WeekStatus::Completed,
                std::cmp::Ordering::Equal => WeekStatus::Live,
                std::cmp::Ordering::Greater => WeekStatus::Upcoming,
            },
        }
    }
}

impl Payload for NflState {
    fn validate(&self) -> Result<(), String> {
        require_season(&self.season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(season_type: &str, week: u32) -> NflState {
        serde_json::from_value(serde_json::json!({
            "week": week,
            "season": "2024",
            "season_type": season_type,
            "display_week": week,
            "season_start_date": "2024-09-05"
        }))
        .unwrap()
    }

    #[test]
    fn test_decodes_start_date() {
        let s = state("regular", 6);
        assert_eq!(
            s.season_start_date,
            Some(NaiveDate::from_ymd_opt(2024, 9, 5).unwrap())
        );
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_week_status_in_season() {
        let s = state("regular", 6);
        assert_eq!(s.week_status("2024", 5), WeekStatus::Completed);
        assert_eq!(s.week_status("2024", 6), WeekStatus::Live);
        assert_eq!(s.week_status("2024", 7), WeekStatus::Upcoming);
        assert_eq!(s.week_status("2023", 17), WeekStatus::Completed);
        assert_eq!(s.week_status("2025", 1), WeekStatus::Upcoming);
    }

    #[test]
    fn test_week_status_off_season() {
        let s = state("off", 0);
        assert_eq!(s.week_status("2024", 10), WeekStatus::Completed);
        let s = state("pre", 0);
        assert_eq!(s.week_status("2024", 1), WeekStatus::Upcoming);
    }

    #[test]
    fn test_ttl_context_mapping() {
        assert!(WeekStatus::Live.ttl_context().live_week);
        assert!(WeekStatus::Upcoming.ttl_context().live_week);
        assert!(!WeekStatus::Completed.ttl_context().live_week);
    }
}
