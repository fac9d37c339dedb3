use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};

use crate::error::{AppError, AppResult};
use crate::models::{BurnoutPrediction, User, UserChanges, UserFilter};
use crate::repositories::UserStore;

const COLLECTION: &str = "users";

/// MongoDB-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(COLLECTION),
        }
    }

    /// Create the unique index on email (idempotent)
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: User) -> AppResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(map_write_error)?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "User created");
        Ok(user)
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<User> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, id: ObjectId, changes: &UserChanges) -> AppResult<User> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set_document(changes) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    async fn push_prediction(&self, id: ObjectId, prediction: BurnoutPrediction) -> AppResult<()> {
        let entry = bson::to_bson(&prediction)?;

        // Atomic append, no read-modify-write
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$push": { "burnoutPredictions": entry } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn map_write_error(e: mongodb::error::Error) -> AppError {
    if e.to_string().contains("E11000") || e.to_string().contains("duplicate key") {
        AppError::Conflict("Email already exists".to_string())
    } else {
        AppError::Database(e.to_string())
    }
}

fn filter_document(filter: &UserFilter) -> Document {
    let mut query = Document::new();

    if let Some(role) = filter.role {
        query.insert("role", role.as_str());
    }
    if let Some(term) = &filter.search {
        // Search terms are matched literally
        let pattern = regex::escape(term);
        query.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "email": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }

    query
}

fn set_document(changes: &UserChanges) -> Document {
    let mut set = Document::new();

    if let Some(name) = &changes.name {
        set.insert("name", name.as_str());
    }
    if let Some(email) = &changes.email {
        set.insert("email", email.as_str());
    }
    if let Some(hash) = &changes.password_hash {
        set.insert("password", hash.as_str());
    }
    if let Some(role) = changes.role {
        set.insert("role", role.as_str());
    }
    if let Some(bio) = &changes.bio {
        set.insert("bio", bio.as_str());
    }
    if let Some(location) = &changes.location {
        set.insert("location", location.as_str());
    }
    if let Some(company) = &changes.company {
        set.insert("company", company.as_str());
    }
    if let Some(position) = &changes.position {
        set.insert("position", position.as_str());
    }
    if let Some(avatar) = &changes.avatar {
        set.insert("avatar", avatar.as_str());
    }

    set
}
