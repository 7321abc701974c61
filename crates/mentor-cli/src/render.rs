//! Plain-text rendering for plans, history, topics, and suggestions.

use std::fmt::Write;

use mentor_db::models::{DailyPlan, Subject, Topic, TopicSuggestion};

fn topic_name<'a>(topics: &'a [Topic], id: &'a str) -> &'a str {
    topics
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.as_str())
        .unwrap_or(id)
}

/// One plan with its items.
pub fn plan(plan: &DailyPlan, topics: &[Topic]) -> String {
    let mut out = String::new();
    let mut tags = Vec::new();
    if plan.preview_flag {
        tags.push("preview");
    }
    if plan.completed {
        tags.push("completed");
    }
    let _ = write!(out, "Plan for {}", plan.date);
    if !tags.is_empty() {
        let _ = write!(out, " [{}]", tags.join(", "));
    }
    out.push('\n');
    let _ = writeln!(out, "  {}", plan.mentor_message);
    out.push('\n');

    if plan.items.is_empty() {
        out.push_str("  Nothing scheduled.\n");
    } else {
        let names: Vec<&str> = plan
            .items
            .iter()
            .map(|i| topic_name(topics, &i.topic_id))
            .collect();
        let name_w = names.iter().map(|n| n.len()).max().unwrap_or(5).max(5);
        let subj_w = plan
            .items
            .iter()
            .map(|i| i.subject_id.len())
            .max()
            .unwrap_or(7)
            .max(7);

        let _ = writeln!(out, "  {:<name_w$}  {:<subj_w$}  {:>5}  REASON", "TOPIC", "SUBJECT", "HOURS");
        for (item, name) in plan.items.iter().zip(&names) {
            let _ = writeln!(
                out,
                "  {:<name_w$}  {:<subj_w$}  {:>5.2}  {}",
                name, item.subject_id, item.allocated_time, item.reason
            );
        }
        let _ = writeln!(out, "\n  Total: {:.2}h", plan.total_hours());
    }
    let _ = writeln!(out, "  Reasoning: {}", plan.reasoning);
    out
}

/// Plan history as a table, oldest first.
pub fn history(plans: &[DailyPlan]) -> String {
    if plans.is_empty() {
        return "No plans yet. Use `mentor plan today` to create one.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<10}  {:>5}  {:>6}  STATUS", "DATE", "ITEMS", "HOURS");
    for p in plans {
        let status = if p.completed { "completed" } else { "open" };
        let _ = writeln!(
            out,
            "{:<10}  {:>5}  {:>6.2}  {status}",
            p.date.to_string(),
            p.items.len(),
            p.total_hours()
        );
    }
    out
}

/// Topics grouped by subject in syllabus order.
pub fn topics(subjects: &[Subject], topics: &[Topic]) -> String {
    if topics.is_empty() {
        return "No topics. Use `mentor onboard <file>` to import a syllabus.\n".to_string();
    }
    let id_w = topics.iter().map(|t| t.id.len()).max().unwrap_or(2).max(2);
    let name_w = topics.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);

    let mut out = String::new();
    for subject in subjects {
        let mine: Vec<&Topic> = topics.iter().filter(|t| t.subject_id == subject.id).collect();
        if mine.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} ({})", subject.name, subject.id);
        let _ = writeln!(
            out,
            "  {:<id_w$}  {:<name_w$}  {:<10}  {:<7}  {:<4}  {:>8}  {:>10}",
            "ID", "NAME", "DIFFICULTY", "STATUS", "HARD", "EXPOSURE", "CONFIDENCE"
        );
        for t in mine {
            let _ = writeln!(
                out,
                "  {:<id_w$}  {:<name_w$}  {:<10}  {:<7}  {:<4}  {:>8}  {:>9}%",
                t.id,
                t.name,
                t.difficulty.to_string(),
                t.status.to_string(),
                if t.is_hard_marked { "yes" } else { "" },
                t.exposure_count,
                t.confidence_score
            );
        }
        out.push('\n');
    }
    out
}

pub fn suggestions(subject: &str, suggestions: &[TopicSuggestion]) -> String {
    if suggestions.is_empty() {
        return format!("No new suggestions for {subject}.\n");
    }
    let mut out = format!("Suggestions for {subject}:\n");
    for s in suggestions {
        let _ = writeln!(
            out,
            "  - {} ({}, ~{}h)",
            s.name, s.difficulty, s.estimated_hours
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mentor_db::models::{Difficulty, PlanItem, TopicStatus};

    use super::*;

    fn sample_plan(completed: bool) -> DailyPlan {
        DailyPlan {
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            mentor_message: "Easy does it.".to_string(),
            reasoning: "Short day.".to_string(),
            items: vec![PlanItem {
                subject_id: "math".to_string(),
                topic_id: "lim".to_string(),
                allocated_time: 1.5,
                reason: "foundation".to_string(),
            }],
            completed,
            preview_flag: false,
        }
    }

    fn sample_topic() -> Topic {
        Topic {
            id: "lim".to_string(),
            subject_id: "math".to_string(),
            name: "Limits".to_string(),
            difficulty: Difficulty::Medium,
            estimated_hours: 2.0,
            status: TopicStatus::Pending,
            is_hard_marked: true,
            exposure_count: 2,
            confidence_score: 0,
        }
    }

    #[test]
    fn plan_shows_topic_names_and_total() {
        let text = plan(&sample_plan(true), &[sample_topic()]);
        assert!(text.starts_with("Plan for 2026-04-01 [completed]\n"));
        assert!(text.contains("Limits"));
        assert!(text.contains("foundation"));
        assert!(text.contains("Total: 1.50h"));
        assert!(text.contains("Reasoning: Short day."));
    }

    #[test]
    fn plan_falls_back_to_topic_id() {
        let text = plan(&sample_plan(false), &[]);
        assert!(text.starts_with("Plan for 2026-04-01\n"));
        assert!(text.contains("  lim "));
    }

    #[test]
    fn history_lists_each_day() {
        let text = history(&[sample_plan(false)]);
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("2026-04-01"));
        assert!(row.ends_with("open"));
        assert!(history(&[]).starts_with("No plans yet"));
    }

    #[test]
    fn topics_group_under_subjects() {
        let subjects = vec![
            Subject { id: "math".to_string(), name: "Mathematics".to_string() },
            Subject { id: "bio".to_string(), name: "Biology".to_string() },
        ];
        let text = topics(&subjects, &[sample_topic()]);
        assert!(text.starts_with("Mathematics (math)\n"));
        assert!(!text.contains("Biology"));
        assert!(text.contains("yes"));
    }

    #[test]
    fn suggestions_list() {
        let s = TopicSuggestion {
            name: "Series".to_string(),
            difficulty: Difficulty::Hard,
            estimated_hours: 4.0,
            subject_id: "math".to_string(),
            suggested: true,
        };
        assert_eq!(suggestions("Mathematics", &[s]), "Suggestions for Mathematics:\n  - Series (hard, ~4h)\n");
        assert_eq!(suggestions("Mathematics", &[]), "No new suggestions for Mathematics.\n");
    }
}
