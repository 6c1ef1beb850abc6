//! Integration tests against a live MongoDB instance.
//!
//! Run with `cargo test -- --ignored` and a reachable `MONGO_URL`. Every test
//! opens its own freshly named database, so runs never share state and need
//! no serialization.

use canvass::{
    database::{Store, init_mongo},
    models::{Answer, RespondentInfo, Response},
};
use chrono::Utc;
use mongodb::bson::{Bson, oid::ObjectId};

async fn test_store(tag: &str) -> Store {
    let url =
        std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db = format!("canvass_test_{tag}_{}", ObjectId::new().to_hex());

    init_mongo(&url, &db).await.unwrap()
}

fn sample_response(survey_id: ObjectId, ip: &str) -> Response {
    Response {
        id: None,
        survey_id,
        answers: vec![Answer {
            question_id: "q1".to_string(),
            question_text: "How satisfied are you?".to_string(),
            question_type: "rating".to_string(),
            value: Bson::Int32(4),
        }],
        respondent_info: Some(RespondentInfo {
            ip_address: Some(ip.to_string()),
            user_agent: None,
            session_id: None,
        }),
        submitted_at: Utc::now(),
        is_complete: true,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_duplicate_respondents_both_persist() {
    let store = test_store("dup").await;
    let survey_id = ObjectId::new();

    let first = store
        .create_response(sample_response(survey_id, "10.0.0.1"))
        .await
        .unwrap();
    let second = store
        .create_response(sample_response(survey_id, "10.0.0.1"))
        .await
        .unwrap();
    assert_ne!(first, second);

    let stored = store.responses_for_survey(survey_id).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_candidate_duplicate_lookup() {
    let store = test_store("lookup").await;
    let survey_id = ObjectId::new();

    for ip in ["10.0.0.1", "10.0.0.1", "10.0.0.2"] {
        store
            .create_response(sample_response(survey_id, ip))
            .await
            .unwrap();
    }

    let repeats = store
        .candidate_duplicates(survey_id, "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(repeats.len(), 2);

    let fresh = store
        .candidate_duplicates(survey_id, "10.0.0.3")
        .await
        .unwrap();
    assert!(fresh.is_empty());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn test_invalid_document_never_persists() {
    let store = test_store("invalid").await;
    let survey_id = ObjectId::new();

    let mut response = sample_response(survey_id, "10.0.0.1");
    response.answers[0].question_id = String::new();

    assert!(store.create_response(response).await.is_err());

    let stored = store.responses_for_survey(survey_id).await.unwrap();
    assert!(stored.is_empty());
}
