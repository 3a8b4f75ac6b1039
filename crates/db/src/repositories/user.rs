//! User repository: registration and lookup.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{users, workspaces};
use khata_shared::auth::roles;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// The email is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// User not found.
    #[error("User not found")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a user.
///
/// Registration creates a new workspace with this user as its admin.
#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    /// User full name.
    pub name: String,
    /// User email (unique).
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Workspace name; defaults to a name derived from the user's.
    pub workspace_name: Option<String>,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a user, creating their workspace in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        input: RegisterUserInput,
    ) -> Result<(workspaces::Model, users::Model), UserError> {
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::EmailTaken(input.email));
        }

        let now = Utc::now().fixed_offset();
        let workspace_name = input
            .workspace_name
            .unwrap_or_else(|| format!("{}'s books", input.name));

        let txn = self.db.begin().await?;

        let workspace = workspaces::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(workspace_name),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            workspace_id: Set(workspace.id),
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(roles::ADMIN.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok((workspace, user))
    }

    /// Finds a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such user exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound)
    }
}
