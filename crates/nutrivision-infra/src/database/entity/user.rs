//! User entity for SeaORM.
//!
//! The dietary profile and chat history are embedded JSON documents.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use nutrivision_core::domain::{ChatMessage, DietProfile, User};
use nutrivision_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub profile: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub chat_history: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let profile: DietProfile = serde_json::from_value(model.profile)
            .map_err(|e| RepoError::Corrupt(format!("profile of user {}: {}", model.id, e)))?;
        let chat_history: Vec<ChatMessage> = serde_json::from_value(model.chat_history)
            .map_err(|e| RepoError::Corrupt(format!("chat history of user {}: {}", model.id, e)))?;

        Ok(Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            profile,
            chat_history,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

impl TryFrom<User> for ActiveModel {
    type Error = RepoError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let profile =
            serde_json::to_value(&user.profile).map_err(|e| RepoError::Query(e.to_string()))?;
        let chat_history = serde_json::to_value(&user.chat_history)
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(Self {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            profile: Set(profile),
            chat_history: Set(chat_history),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        })
    }
}
