use anyhow::Result;

use crate::app::App;
use crate::commands::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sessions = app.sessions.list_sessions()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = sessions
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "topic": s.topic,
                        "currentStage": s.current_stage,
                        "progress": s.progress,
                        "stages": s.history.len(),
                        "testResults": s.test_results.as_ref().map_or(0, Vec::len),
                        "notes": s.notes.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if sessions.is_empty() {
                println!("No sessions found.");
                return Ok(());
            }

            for session in &sessions {
                let results = session.test_results.as_ref().map_or(0, Vec::len);
                println!(
                    "{}  {} (stage {}, {}% progress, {} quizzes, {} notes)",
                    paint(&session.id, Color::DIM, use_color),
                    paint(&session.topic, Color::BOLD, use_color),
                    session.current_stage,
                    session.progress,
                    results,
                    session.notes.len()
                );
            }

            println!("\n{} sessions total", sessions.len());
        }
    }

    Ok(())
}
