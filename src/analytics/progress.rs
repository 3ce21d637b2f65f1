//! Performance analysis over a session's quiz results and notes
//!
//! Every function here is pure: the same session always yields the same
//! metrics. Ranked lists are ordered by descending frequency; labels with
//! equal counts keep the order in which they were first encountered.

use std::collections::{BTreeMap, HashMap};

use super::models::{NoteAnalysis, PerformanceMetrics, ScorePoint, TOP_N};
use crate::errors::{EngineError, EngineResult};
use crate::session::{Note, Session, Stage, TestResult};

/// Build the metrics snapshot for `session`.
///
/// Fails only when the session or its results collection is missing; an
/// empty results list yields zeroed metrics.
pub fn analyze_performance(session: Option<&Session>) -> EngineResult<PerformanceMetrics> {
    let session = session
        .ok_or_else(|| EngineError::InvalidInput("no session provided".to_string()))?;
    let results = session.results()?;

    let weak_areas = identify_weak_areas(results);
    let recommended_review = review_recommendations(&weak_areas);

    Ok(PerformanceMetrics {
        average_score: average_score(results),
        weak_areas,
        study_time: calculate_study_time(&session.history),
        notes_analysis: analyze_notes(&session.notes),
        recommended_review,
    })
}

pub fn average_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64
}

/// Up to five most frequently missed labels
pub fn identify_weak_areas(results: &[TestResult]) -> Vec<String> {
    top_by_frequency(
        results
            .iter()
            .flat_map(|r| r.incorrect_answers.iter().map(String::as_str)),
    )
}

/// Minutes from the first to the last stage with a usable timestamp, in
/// history order (not sorted). Fewer than two such stages means 0.
pub fn calculate_study_time(history: &[Stage]) -> i64 {
    let mut stamps = history.iter().filter_map(|stage| stage.timestamp);
    let Some(first) = stamps.next() else {
        return 0;
    };
    let Some(last) = stamps.last() else {
        return 0;
    };

    // Halves round toward positive infinity, also for negative spans
    let minutes = (last - first).num_milliseconds() as f64 / 60_000.0;
    (minutes + 0.5).floor() as i64
}

pub fn analyze_notes(notes: &[Note]) -> NoteAnalysis {
    let common_tags =
        top_by_frequency(notes.iter().flat_map(|n| n.tags.iter().map(String::as_str)));

    let mut notes_per_day: BTreeMap<String, usize> = BTreeMap::new();
    for note in notes {
        let day = note.timestamp.date_naive().format("%Y-%m-%d").to_string();
        *notes_per_day.entry(day).or_insert(0) += 1;
    }

    NoteAnalysis {
        common_tags,
        notes_per_day,
        total_notes: notes.len(),
    }
}

/// One recommendation per weak area, same order
pub fn review_recommendations(weak_areas: &[String]) -> Vec<String> {
    weak_areas
        .iter()
        .map(|area| format!("Recommended review: {}", area))
        .collect()
}

/// Scores in result order, labelled "Test 1", "Test 2", ...
pub fn score_history(results: &[TestResult]) -> Vec<ScorePoint> {
    results
        .iter()
        .enumerate()
        .map(|(idx, r)| ScorePoint {
            name: format!("Test {}", idx + 1),
            score: r.score,
        })
        .collect()
}

/// Context for generating the next stage so it targets the weak areas
pub fn optimization_hint(session: &Session, metrics: &PerformanceMetrics) -> String {
    format!(
        "Topic: {}\n\
         Stage: {}\n\
         Weak areas: {}\n\
         Average score: {}\n\
         \n\
         Please create content that:\n\
         1. Pays special attention to the weak areas above\n\
         2. Matches the learner's current level\n\
         3. Includes practical examples\n\
         4. Contains check questions",
        session.topic,
        session.current_stage + 1,
        metrics.weak_areas.join(", "),
        metrics.average_score,
    )
}

/// Count labels, then rank by count with first-seen order breaking ties
fn top_by_frequency<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for label in labels {
        match index.get(label) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(label, counts.len());
                counts.push((label, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_N)
        .map(|(label, _)| label.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn result(score: f64, incorrect: &[&str]) -> TestResult {
        TestResult {
            step_id: 0,
            score,
            completed_at: at(12, 0),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn stage(n: u32, timestamp: Option<DateTime<Utc>>) -> Stage {
        Stage {
            stage: n,
            content: format!("stage {}", n),
            completed: false,
            timestamp,
            quiz: Vec::new(),
            summary: String::new(),
        }
    }

    fn note(tags: &[&str], timestamp: DateTime<Utc>) -> Note {
        Note::new(
            "note".to_string(),
            1,
            tags.iter().map(|s| s.to_string()).collect(),
            timestamp,
        )
    }

    fn session(results: Option<Vec<TestResult>>) -> Session {
        Session {
            id: "1".to_string(),
            topic: "Rust".to_string(),
            current_stage: 2,
            progress: 0,
            history: vec![stage(1, Some(at(10, 0))), stage(2, Some(at(10, 45)))],
            notes: vec![note(&["traits"], at(11, 0))],
            test_results: results,
            last_api_call: 0,
        }
    }

    #[test]
    fn test_missing_session_or_results_is_invalid() {
        assert!(matches!(analyze_performance(None), Err(EngineError::InvalidInput(_))));
        assert!(matches!(
            analyze_performance(Some(&session(None))),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_results_yield_zeroed_metrics() {
        let metrics = analyze_performance(Some(&session(Some(Vec::new())))).unwrap();

        assert_eq!(metrics.average_score, 0.0);
        assert!(metrics.weak_areas.is_empty());
        assert!(metrics.recommended_review.is_empty());
        assert_eq!(metrics.study_time, 45);
        assert_eq!(metrics.notes_analysis.total_notes, 1);
    }

    #[test]
    fn test_full_analysis() {
        let results = vec![
            result(60.0, &["borrowing", "lifetimes"]),
            result(80.0, &["lifetimes"]),
            result(100.0, &[]),
        ];
        let metrics = analyze_performance(Some(&session(Some(results)))).unwrap();

        assert_eq!(metrics.average_score, 80.0);
        assert_eq!(metrics.weak_areas, vec!["lifetimes", "borrowing"]);
        assert_eq!(
            metrics.recommended_review,
            vec!["Recommended review: lifetimes", "Recommended review: borrowing"]
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let s = session(Some(vec![result(70.0, &["a", "b", "a"])]));
        let first = analyze_performance(Some(&s)).unwrap();
        let second = analyze_performance(Some(&s)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_average_within_bounds() {
        let results = vec![result(0.0, &[]), result(100.0, &[]), result(33.3, &[])];
        let avg = average_score(&results);
        assert!((0.0..=100.0).contains(&avg));
    }

    #[test]
    fn test_weak_areas_capped_and_ranked() {
        let results = vec![
            result(10.0, &["a", "b", "c", "d", "e", "f", "g"]),
            result(10.0, &["g", "f", "g"]),
        ];
        let weak = identify_weak_areas(&results);

        assert_eq!(weak.len(), 5);
        // g:3, f:2, then a..e tied at 1 in first-seen order
        assert_eq!(weak, vec!["g", "f", "a", "b", "c"]);
    }

    #[test]
    fn test_study_time_filters_missing_timestamps() {
        let history = vec![
            stage(1, None),
            stage(2, Some(at(9, 0))),
            stage(3, None),
            stage(4, Some(at(10, 30))),
        ];
        assert_eq!(calculate_study_time(&history), 90);
    }

    #[test]
    fn test_study_time_needs_two_timestamps() {
        assert_eq!(calculate_study_time(&[]), 0);
        assert_eq!(calculate_study_time(&[stage(1, Some(at(9, 0)))]), 0);
        assert_eq!(calculate_study_time(&[stage(1, Some(at(9, 0))), stage(2, None)]), 0);
    }

    #[test]
    fn test_study_time_rounds_and_keeps_order() {
        let start = at(9, 0);
        let history = vec![
            stage(1, Some(start)),
            stage(2, Some(start + Duration::seconds(150))),
        ];
        // 2.5 minutes rounds up
        assert_eq!(calculate_study_time(&history), 3);

        // Out-of-order history is not sorted
        let reversed = vec![stage(1, Some(at(10, 0))), stage(2, Some(at(9, 0)))];
        assert_eq!(calculate_study_time(&reversed), -60);
    }

    #[test]
    fn test_study_time_negative_half_rounds_up() {
        let start = at(9, 0);
        let history = vec![
            stage(1, Some(start + Duration::seconds(150))),
            stage(2, Some(start)),
        ];
        assert_eq!(calculate_study_time(&history), -2);

        let history = vec![
            stage(1, Some(start + Duration::seconds(210))),
            stage(2, Some(start)),
        ];
        assert_eq!(calculate_study_time(&history), -3);
    }

    #[test]
    fn test_note_analysis() {
        let day_two = Utc.with_ymd_and_hms(2024, 1, 2, 23, 59, 0).unwrap();
        let notes = vec![
            note(&["rust", "traits"], at(8, 0)),
            note(&["traits", "traits"], at(9, 0)),
            note(&[], day_two),
        ];
        let analysis = analyze_notes(&notes);

        assert_eq!(analysis.common_tags, vec!["traits", "rust"]);
        assert_eq!(analysis.total_notes, 3);
        assert_eq!(analysis.notes_per_day.get("2024-01-01"), Some(&2));
        assert_eq!(analysis.notes_per_day.get("2024-01-02"), Some(&1));
    }

    #[test]
    fn test_common_tags_capped() {
        let notes: Vec<Note> = (0..8)
            .map(|i| note(&[format!("t{}", i).as_str()], at(8, 0)))
            .collect();
        assert_eq!(analyze_notes(&notes).common_tags.len(), 5);
    }

    #[test]
    fn test_score_history_and_hint() {
        let results = vec![result(50.0, &["closures"]), result(90.0, &[])];
        let points = score_history(&results);
        assert_eq!(points[1].name, "Test 2");
        assert_eq!(points[1].score, 90.0);

        let s = session(Some(results));
        let metrics = analyze_performance(Some(&s)).unwrap();
        let hint = optimization_hint(&s, &metrics);
        assert!(hint.contains("Stage: 3"));
        assert!(hint.contains("Weak areas: closures"));
        assert!(hint.contains("Average score: 70"));
    }
}
