use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::google_auth_url,
    error::AppError,
    models::{Answer, Question, RespondentInfo, Response, Survey},
    state::State as ServerState,
    validation::validate_survey_title,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DuplicateQuery {
    pub ip: String,
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::MalformedPayload)
}

fn build_survey(payload: SurveyPayload, created_at: chrono::DateTime<Utc>) -> Survey {
    Survey {
        id: None,
        title: payload.title.trim().to_string(),
        description: payload.description,
        questions: payload.questions,
        created_at,
    }
}

pub async fn create_survey_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<SurveyPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !validate_survey_title(&payload.title) {
        return Err(AppError::InvalidDocument("title must be 1-200 characters"));
    }

    let survey = build_survey(payload, Utc::now());
    let id = state.store.create_survey(survey).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_hex() }))))
}

pub async fn list_surveys_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, AppError> {
    let surveys = state.store.list_surveys().await?;

    Ok(Json(surveys))
}

pub async fn get_survey_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let survey = state.store.get_survey(parse_object_id(&id)?).await?;

    Ok(Json(survey))
}

pub async fn update_survey_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(payload): Json<SurveyPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !validate_survey_title(&payload.title) {
        return Err(AppError::InvalidDocument("title must be 1-200 characters"));
    }

    let survey_id = parse_object_id(&id)?;

    // Edits never touch creation time.
    let existing = state.store.get_survey(survey_id).await?;
    let survey = build_survey(payload, existing.created_at);

    let updated = state.store.update_survey(survey_id, survey).await?;

    Ok(Json(updated))
}

pub async fn delete_survey_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_survey(parse_object_id(&id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_response_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    ConnectInfo(address): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ResponsePayload>,
) -> Result<impl IntoResponse, AppError> {
    let survey_id = parse_object_id(&id)?;

    // A response has to reference a live survey; reject before writing.
    state.store.get_survey(survey_id).await?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = Response {
        id: None,
        survey_id,
        answers: payload.answers,
        respondent_info: Some(RespondentInfo {
            ip_address: Some(address.ip().to_string()),
            user_agent,
            session_id: payload.session_id,
        }),
        submitted_at: Utc::now(),
        is_complete: true,
    };

    let response_id = state.store.create_response(response).await?;
    info!("Recorded response {response_id} for survey {survey_id}");

    Ok((StatusCode::CREATED, Json(json!({ "id": response_id.to_hex() }))))
}

pub async fn list_responses_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let responses = state
        .store
        .responses_for_survey(parse_object_id(&id)?)
        .await?;

    Ok(Json(responses))
}

/// Soft-dedup hint for clients. Reports whether this address already
/// submitted; never used to block a submission.
pub async fn check_duplicates_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Query(query): Query<DuplicateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let candidates = state
        .store
        .candidate_duplicates(parse_object_id(&id)?, &query.ip)
        .await?;

    Ok(Json(json!({
        "duplicate": !candidates.is_empty(),
        "count": candidates.len(),
    })))
}

pub async fn auth_url_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({ "url": google_auth_url(&state.config.api_base_url) }))
}

#[cfg(test)]
mod tests {
    use super::parse_object_id;

    #[test]
    fn test_object_id_parsing() {
        assert!(parse_object_id("5f8d0d55b54764421b7156c3").is_ok());
        assert!(parse_object_id("not-an-id").is_err());
        assert!(parse_object_id("").is_err());
    }
}
