use anyhow::Result;
use chrono::Utc;

use studyflow_lib::review::{due_reviews, format_interval, generate_review_schedule, Importance};

use crate::app::App;
use crate::commands::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    session_arg: &str,
    due_only: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let session = app.resolve_session(session_arg)?;
    let now = Utc::now();

    let mut schedule = generate_review_schedule(&session)?;
    if due_only {
        schedule = due_reviews(&schedule, now);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        OutputFormat::Plain => {
            if schedule.is_empty() {
                println!("{}", if due_only { "Nothing due." } else { "No reviews scheduled." });
                return Ok(());
            }

            for entry in &schedule {
                let color = match entry.importance {
                    Importance::High => Color::RED,
                    Importance::Medium => Color::YELLOW,
                    Importance::Low => Color::GREEN,
                };
                let days_left = (entry.next_review - now).num_days();
                let when = if entry.is_due(now) {
                    "due".to_string()
                } else {
                    format!("in {}", format_interval(days_left.max(1)))
                };

                println!(
                    "{}  {:<6} {:<8} stage {}  {}",
                    entry.next_review.format("%Y-%m-%d"),
                    paint(&entry.importance.to_string(), color, use_color),
                    when,
                    entry.step_id + 1,
                    entry.topic.replace('\n', " ")
                );
            }

            println!("\n{} reviews", schedule.len());
        }
    }

    Ok(())
}
