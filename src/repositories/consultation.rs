use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Collection, Database};

use crate::error::{AppError, AppResult};
use crate::models::{Consultation, ConsultationChanges, ConsultationFilter};
use crate::repositories::ConsultationStore;

const COLLECTION: &str = "consultations";

/// MongoDB-backed consultation repository
#[derive(Clone)]
pub struct ConsultationRepository {
    collection: Collection<Consultation>,
}

impl ConsultationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Consultation>(COLLECTION),
        }
    }
}

#[async_trait]
impl ConsultationStore for ConsultationRepository {
    async fn insert(&self, consultation: Consultation) -> AppResult<Consultation> {
        self.collection.insert_one(&consultation).await?;
        Ok(consultation)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Consultation> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("Consultation".to_string()))
    }

    async fn list(&self, filter: &ConsultationFilter) -> AppResult<Vec<Consultation>> {
        let mut query = Document::new();
        if let Some(status) = filter.status {
            query.insert("status", status.as_str());
        }

        let cursor = self
            .collection
            .find(query)
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, id: ObjectId, changes: &ConsultationChanges) -> AppResult<Consultation> {
        let mut set = doc! { "updatedAt": bson::DateTime::now() };

        if let Some(status) = changes.status {
            set.insert("status", status.as_str());
        }
        if let Some(notes) = &changes.admin_notes {
            set.insert("adminNotes", notes.as_str());
        }
        if let Some(date) = changes.scheduled_date {
            set.insert("scheduledDate", date);
        }
        if let Some(user_id) = changes.contacted_by {
            set.insert("contactedBy", user_id);
        }

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound("Consultation".to_string()))
    }

    async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Consultation".to_string()));
        }

        Ok(())
    }
}
