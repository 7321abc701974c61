//! Planning context: the deterministic facts computed before any drafting.

use chrono::{Duration, NaiveDate};

use mentor_db::models::{DailyPlan, Profile, Topic, TopicStatus};

/// Exam mode starts when the exam is this many days away or fewer.
pub const EXAM_MODE_DAYS: i64 = 10;

/// Share of the daily budget usable after a missed day.
pub const MISSED_DAY_FACTOR: f64 = 0.7;

/// Facts about the day being planned.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningContext {
    pub target_date: NaiveDate,
    /// The current calendar day, as seen by the caller's clock.
    pub today: NaiveDate,
    pub days_to_exam: i64,
    /// The day before `target_date` has a plan that was not completed.
    pub missed_previous_day: bool,
    pub exam_mode: bool,
    pub daily_available_hours: f64,
}

impl PlanningContext {
    /// Compute the context for `target_date` (defaulting to `today`).
    pub fn new(
        profile: &Profile,
        history: &[DailyPlan],
        target_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let target_date = target_date.unwrap_or(today);
        let days_to_exam = days_to_exam(profile.exam_date, target_date);
        let previous_day = target_date - Duration::days(1);
        let missed_previous_day = history
            .iter()
            .find(|p| p.date == previous_day)
            .is_some_and(|p| !p.completed);

        Self {
            target_date,
            today,
            days_to_exam,
            missed_previous_day,
            exam_mode: days_to_exam <= EXAM_MODE_DAYS,
            daily_available_hours: profile.daily_available_hours,
        }
    }

    /// The day's usable hour ceiling after missed-day reduction.
    pub fn effective_budget(&self) -> f64 {
        effective_budget(self.daily_available_hours, self.missed_previous_day)
    }

    /// Plans for any day other than today are previews.
    pub fn is_preview(&self) -> bool {
        self.target_date != self.today
    }
}

/// Whole days from `target` until `exam`, never negative.
pub fn days_to_exam(exam: NaiveDate, target: NaiveDate) -> i64 {
    (exam - target).num_days().max(0)
}

/// `daily_hours`, reduced to 70% after a missed day.
pub fn effective_budget(daily_hours: f64, missed_previous_day: bool) -> f64 {
    if missed_previous_day {
        daily_hours * MISSED_DAY_FACTOR
    } else {
        daily_hours
    }
}

/// The syllabus split the way the drafting prompt needs it.
#[derive(Debug, Clone, Default)]
pub struct TopicSets<'a> {
    pub pending: Vec<&'a Topic>,
    pub completed: Vec<&'a Topic>,
    /// Pending topics the user marked hard, most exposed first.
    pub priority: Vec<&'a Topic>,
}

impl<'a> TopicSets<'a> {
    pub fn from_topics(topics: &'a [Topic]) -> Self {
        let pending: Vec<&Topic> = topics
            .iter()
            .filter(|t| t.status == TopicStatus::Pending)
            .collect();
        let completed = topics
            .iter()
            .filter(|t| t.status == TopicStatus::Done)
            .collect();

        let mut priority: Vec<&Topic> =
            pending.iter().copied().filter(|t| t.is_hard_marked).collect();
        // sort_by is stable: equal exposure keeps syllabus order.
        priority.sort_by(|a, b| b.exposure_count.cmp(&a.exposure_count));

        Self {
            pending,
            completed,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use mentor_db::models::Difficulty;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn profile(exam: &str, hours: f64) -> Profile {
        Profile {
            exam_date: date(exam),
            daily_available_hours: hours,
            preferred_study_time: "morning".to_string(),
            onboarding_completed: true,
        }
    }

    fn plan(day: &str, completed: bool) -> DailyPlan {
        DailyPlan {
            date: date(day),
            mentor_message: String::new(),
            reasoning: String::new(),
            items: vec![],
            completed,
            preview_flag: false,
        }
    }

    fn topic(id: &str, status: TopicStatus, hard_marked: bool, exposure: i32) -> Topic {
        Topic {
            id: id.to_string(),
            subject_id: "s".to_string(),
            name: id.to_string(),
            difficulty: Difficulty::Medium,
            estimated_hours: 1.0,
            status,
            is_hard_marked: hard_marked,
            exposure_count: exposure,
            confidence_score: 0,
        }
    }

    #[test]
    fn days_to_exam_is_floored_at_zero() {
        assert_eq!(days_to_exam(date("2026-05-10"), date("2026-05-01")), 9);
        assert_eq!(days_to_exam(date("2026-05-10"), date("2026-05-10")), 0);
        assert_eq!(days_to_exam(date("2026-05-10"), date("2026-05-20")), 0);
    }

    #[test]
    fn target_defaults_to_today() {
        let ctx = PlanningContext::new(&profile("2026-09-01", 4.0), &[], None, date("2026-05-01"));
        assert_eq!(ctx.target_date, date("2026-05-01"));
        assert!(!ctx.is_preview());
        assert!(!ctx.exam_mode);
        assert!(!ctx.missed_previous_day);
        assert_eq!(ctx.effective_budget(), 4.0);
    }

    #[test]
    fn exam_mode_boundary_is_inclusive() {
        let p = profile("2026-05-11", 4.0);
        let on = PlanningContext::new(&p, &[], Some(date("2026-05-01")), date("2026-05-01"));
        assert_eq!(on.days_to_exam, 10);
        assert!(on.exam_mode);

        let off = PlanningContext::new(&p, &[], Some(date("2026-04-30")), date("2026-04-30"));
        assert_eq!(off.days_to_exam, 11);
        assert!(!off.exam_mode);
    }

    #[test]
    fn missed_day_requires_an_incomplete_plan_yesterday() {
        let p = profile("2026-09-01", 4.0);
        let today = date("2026-05-02");

        let missed = PlanningContext::new(&p, &[plan("2026-05-01", false)], None, today);
        assert!(missed.missed_previous_day);
        assert!((missed.effective_budget() - 2.8).abs() < 1e-9);

        let done = PlanningContext::new(&p, &[plan("2026-05-01", true)], None, today);
        assert!(!done.missed_previous_day);

        // A skipped day with no plan at all is not a missed day.
        let gap = PlanningContext::new(&p, &[plan("2026-04-30", false)], None, today);
        assert!(!gap.missed_previous_day);
    }

    #[test]
    fn preview_looks_at_the_day_before_the_target() {
        let p = profile("2026-09-01", 5.0);
        let today = date("2026-05-02");
        let history = [plan("2026-05-02", false)];

        let preview = PlanningContext::new(&p, &history, Some(date("2026-05-03")), today);
        assert!(preview.is_preview());
        assert!(preview.missed_previous_day);
        assert!((preview.effective_budget() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn effective_budget_is_seventy_percent_when_missed() {
        for hours in [1.0, 2.5, 4.0, 7.25] {
            assert!((effective_budget(hours, true) - 0.7 * hours).abs() < 1e-9);
            assert_eq!(effective_budget(hours, false), hours);
        }
    }

    #[test]
    fn priority_is_hard_marked_pending_by_exposure_desc_stable() {
        let topics = vec![
            topic("a", TopicStatus::Pending, true, 1),
            topic("b", TopicStatus::Pending, false, 9),
            topic("c", TopicStatus::Pending, true, 3),
            topic("d", TopicStatus::Done, true, 7),
            topic("e", TopicStatus::Pending, true, 1),
        ];
        let sets = TopicSets::from_topics(&topics);

        let ids = |v: &[&Topic]| v.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&sets.pending), vec!["a", "b", "c", "e"]);
        assert_eq!(ids(&sets.completed), vec!["d"]);
        assert_eq!(ids(&sets.priority), vec!["c", "a", "e"]);
    }
}
