use anyhow::Result;

use studyflow_lib::analytics::{analyze_performance, score_history};

use crate::app::App;
use crate::commands::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, session_arg: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let session = app.resolve_session(session_arg)?;
    let metrics = analyze_performance(Some(&session))?;
    let history = score_history(session.results()?);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "sessionId": session.id,
                "topic": session.topic,
                "metrics": metrics,
                "scoreHistory": history,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let title = format!("Progress analysis: {}", session.topic);
            println!("{}", paint(&title, Color::BOLD, use_color));
            println!();
            println!("Average score:  {:.1}%", metrics.average_score);
            println!("Study time:     {} min", metrics.study_time);
            println!("Notes:          {}", metrics.notes_analysis.total_notes);

            if !history.is_empty() {
                println!();
                println!("Scores");
                for point in &history {
                    println!("  {:<8} {:>5.1}%", point.name, point.score);
                }
            }

            if !metrics.weak_areas.is_empty() {
                println!();
                println!("Weak areas");
                for area in &metrics.weak_areas {
                    println!("  {}", paint(area, Color::RED, use_color));
                }
            }

            if !metrics.notes_analysis.common_tags.is_empty() {
                println!();
                let tags: Vec<String> = metrics
                    .notes_analysis
                    .common_tags
                    .iter()
                    .map(|t| format!("#{}", t))
                    .collect();
                println!("Common tags: {}", tags.join(" "));
            }

            if !metrics.notes_analysis.notes_per_day.is_empty() {
                println!();
                println!("Notes per day");
                for (day, count) in &metrics.notes_analysis.notes_per_day {
                    println!("  {}  {}", day, count);
                }
            }

            if !metrics.recommended_review.is_empty() {
                println!();
                for recommendation in &metrics.recommended_review {
                    println!("{}", paint(recommendation, Color::YELLOW, use_color));
                }
            }
        }
    }

    Ok(())
}
