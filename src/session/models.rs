//! Data models for study sessions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::content::GeneratedContent;
use super::quiz::calculate_progress;
use crate::clock::Clock;
use crate::errors::{EngineError, EngineResult};

/// Key prefix under which sessions are persisted
pub const SESSION_KEY_PREFIX: &str = "learning_session_";

/// A learning session on one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub topic: String,
    #[serde(default = "default_current_stage")]
    pub current_stage: u32,
    /// 0-100
    #[serde(default)]
    pub progress: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<Stage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<Note>,
    /// `None` when the payload carried no results collection at all
    #[serde(default)]
    pub test_results: Option<Vec<TestResult>>,
    /// Epoch milliseconds of the last generation call, 0 if never
    #[serde(default)]
    pub last_api_call: i64,
}

fn default_current_stage() -> u32 {
    1
}

impl Session {
    /// Start a session from the first generated stage
    pub fn new(topic: String, first_stage: GeneratedContent, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id: now.timestamp_millis().to_string(),
            topic,
            current_stage: 1,
            progress: 0,
            history: vec![Stage::from_generated(1, first_stage, now)],
            notes: Vec::new(),
            test_results: Some(Vec::new()),
            last_api_call: now.timestamp_millis(),
        }
    }

    /// Key used by [`crate::storage::SessionStorage`]
    pub fn storage_key(&self) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, self.id)
    }

    /// The results collection, rejecting sessions that lack one
    pub fn results(&self) -> EngineResult<&[TestResult]> {
        self.test_results
            .as_deref()
            .ok_or_else(|| EngineError::InvalidInput("session has no test results".to_string()))
    }

    /// Copy with a completed quiz appended and progress recomputed
    pub fn with_result(&self, result: TestResult) -> Self {
        let mut updated = self.clone();
        updated.progress = calculate_progress(self, &result);
        updated
            .test_results
            .get_or_insert_with(Vec::new)
            .push(result);
        updated
    }

    /// Copy with a note appended
    pub fn with_note(&self, note: Note) -> Self {
        let mut updated = self.clone();
        updated.notes.push(note);
        updated
    }

    /// Copy advanced to the next generated stage
    pub fn with_stage(&self, content: GeneratedContent, clock: &impl Clock) -> Self {
        let now = clock.now();
        let mut updated = self.clone();
        let next = self.history.len() as u32 + 1;
        updated.history.push(Stage::from_generated(next, content, now));
        updated.current_stage = next;
        updated.last_api_call = now.timestamp_millis();
        updated
    }
}

/// One unit of generated learning content with its quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// 1-based
    pub stage: u32,
    pub content: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub quiz: Vec<Question>,
    #[serde(default)]
    pub summary: String,
}

impl Stage {
    pub fn from_generated(stage: u32, content: GeneratedContent, now: DateTime<Utc>) -> Self {
        Self {
            stage,
            content: content.content,
            completed: false,
            timestamp: Some(now),
            quiz: content.quiz,
            summary: content.summary,
        }
    }
}

/// Explicit `null` reads the same as a missing list
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339, naive date-times, plain dates and epoch milliseconds.
/// Anything else becomes `None` instead of failing the whole session.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// A multiple-choice quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

/// A free-text note attached to a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub step_id: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Note {
    pub fn new(content: String, step_id: u32, tags: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            timestamp: now,
            step_id,
            tags,
        }
    }
}

/// Outcome of completing a stage's quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// 0-based index into the session's `history`
    pub step_id: usize,
    /// 0-100
    pub score: f64,
    pub completed_at: DateTime<Utc>,
    /// Labels of the questions answered incorrectly
    #[serde(default, deserialize_with = "null_as_empty")]
    pub incorrect_answers: Vec<String>,
}
