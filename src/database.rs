//! # MongoDB
//!
//! Document store holding two collections:
//!
//! - `surveys`: the authored survey definitions, editable and deletable.
//! - `responses`: one append-only document per submission.
//!
//! The `responses` collection carries a **non-unique** compound index on
//! `(surveyId, respondentInfo.ipAddress)`. It exists to make candidate
//! duplicate lookups cheap; it never blocks an insert. One respondent
//! submitting twice produces two documents.

use futures::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    bson::{doc, oid::ObjectId},
};
use tracing::info;

use crate::{
    error::AppError,
    models::{Response, Survey},
};

const SURVEYS: &str = "surveys";
const RESPONSES: &str = "responses";

pub struct Store {
    surveys: Collection<Survey>,
    responses: Collection<Response>,
}

pub async fn init_mongo(mongo_url: &str, mongo_db: &str) -> Result<Store, AppError> {
    let client = Client::with_uri_str(mongo_url).await?;
    let database = client.database(mongo_db);

    let store = Store {
        surveys: database.collection(SURVEYS),
        responses: database.collection(RESPONSES),
    };
    store.ensure_indexes().await?;

    info!("Connected to MongoDB database {mongo_db}");

    Ok(store)
}

impl Store {
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        let index = IndexModel::builder()
            .keys(doc! { "surveyId": 1, "respondentInfo.ipAddress": 1 })
            .build();

        self.responses.create_index(index).await?;

        Ok(())
    }

    pub async fn create_survey(&self, mut survey: Survey) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        survey.id = Some(id);

        self.surveys.insert_one(survey).await?;

        Ok(id)
    }

    pub async fn get_survey(&self, id: ObjectId) -> Result<Survey, AppError> {
        self.surveys
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_surveys(&self) -> Result<Vec<Survey>, AppError> {
        let cursor = self.surveys.find(doc! {}).await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn update_survey(&self, id: ObjectId, mut survey: Survey) -> Result<Survey, AppError> {
        survey.id = Some(id);

        let result = self.surveys.replace_one(doc! { "_id": id }, &survey).await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound);
        }

        Ok(survey)
    }

    pub async fn delete_survey(&self, id: ObjectId) -> Result<(), AppError> {
        let result = self.surveys.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Inserts a new response document. The required-field check runs first,
    /// so a bad document fails the write with nothing persisted.
    pub async fn create_response(&self, mut response: Response) -> Result<ObjectId, AppError> {
        response.check_required()?;

        let id = ObjectId::new();
        response.id = Some(id);

        self.responses.insert_one(response).await?;

        Ok(id)
    }

    pub async fn responses_for_survey(
        &self,
        survey_id: ObjectId,
    ) -> Result<Vec<Response>, AppError> {
        let cursor = self.responses.find(doc! { "surveyId": survey_id }).await?;

        Ok(cursor.try_collect().await?)
    }

    /// Responses already recorded for this survey from the same network
    /// address. A hint only: submissions are never blocked on it.
    pub async fn candidate_duplicates(
        &self,
        survey_id: ObjectId,
        ip_address: &str,
    ) -> Result<Vec<Response>, AppError> {
        let cursor = self
            .responses
            .find(doc! { "surveyId": survey_id, "respondentInfo.ipAddress": ip_address })
            .await?;

        Ok(cursor.try_collect().await?)
    }
}
