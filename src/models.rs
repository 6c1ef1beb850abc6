//! Stored document shapes for surveys and their responses.
//!
//! Field names and nesting match the documents already in the database, so
//! every rename here is load-bearing. Responses are append-only: once written
//! they are never updated or deleted.

use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One question inside a survey definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub text: String,
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// The value submitted for one question, carrying a snapshot of the
/// question's text and type so stored responses stay interpretable after the
/// survey is edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub question_type: String,
    /// Shape depends on `questionType`: a single value, an ordered list, or
    /// whatever else the client recorded. Not constrained here.
    #[serde(default = "bson_null")]
    pub value: Bson,
}

fn bson_null() -> Bson {
    Bson::Null
}

/// Best-effort, never-authenticated identification of the submitter. Used
/// only for soft deduplication hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub survey_id: ObjectId,
    /// Insertion order is the order the questions were presented in.
    pub answers: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_info: Option<RespondentInfo>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_complete: bool,
}

fn default_true() -> bool {
    true
}

impl Response {
    /// Required-field check run before any insert. A failure here means the
    /// document is never handed to the driver, so there is no partial write.
    pub fn check_required(&self) -> Result<(), AppError> {
        for answer in &self.answers {
            if answer.question_id.trim().is_empty() {
                return Err(AppError::InvalidDocument("answer is missing questionId"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn sample_response() -> Response {
        Response {
            id: None,
            survey_id: ObjectId::new(),
            answers: vec![Answer {
                question_id: "q1".to_string(),
                question_text: "How satisfied are you?".to_string(),
                question_type: "rating".to_string(),
                value: Bson::Int32(4),
            }],
            respondent_info: Some(RespondentInfo {
                ip_address: Some("10.0.0.1".to_string()),
                user_agent: Some("Mozilla/5.0".to_string()),
                session_id: None,
            }),
            submitted_at: Utc::now(),
            is_complete: true,
        }
    }

    #[test]
    fn test_response_stored_field_names() {
        let doc = bson::to_document(&sample_response()).unwrap();

        assert!(!doc.contains_key("_id"));
        assert!(doc.contains_key("surveyId"));
        assert!(doc.contains_key("answers"));
        assert!(doc.contains_key("respondentInfo"));
        assert!(doc.contains_key("submittedAt"));
        assert!(doc.contains_key("isComplete"));

        let answer = doc.get_array("answers").unwrap()[0].as_document().unwrap();
        assert!(answer.contains_key("questionId"));
        assert!(answer.contains_key("questionText"));
        assert!(answer.contains_key("questionType"));
        assert!(answer.contains_key("value"));

        let info = doc.get_document("respondentInfo").unwrap();
        assert!(info.contains_key("ipAddress"));
        assert!(info.contains_key("userAgent"));
        assert!(!info.contains_key("sessionId"));
    }

    #[test]
    fn test_is_complete_defaults_true() {
        let doc = bson::doc! {
            "surveyId": ObjectId::new(),
            "answers": [],
            "submittedAt": "2026-01-01T00:00:00Z",
        };

        let response: Response = bson::from_document(doc).unwrap();
        assert!(response.is_complete);
        assert!(response.respondent_info.is_none());
    }

    #[test]
    fn test_missing_question_id_is_rejected() {
        let mut response = sample_response();
        response.answers[0].question_id = "  ".to_string();

        assert!(response.check_required().is_err());
    }

    #[test]
    fn test_answer_value_defaults_to_null() {
        let doc = bson::doc! { "questionId": "q1" };

        let answer: Answer = bson::from_document(doc).unwrap();
        assert_eq!(answer.value, Bson::Null);
        assert!(answer.question_text.is_empty());
    }
}
