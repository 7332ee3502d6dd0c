//! PostgreSQL user repository.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, DbConn, DbErr, EntityTrait, QueryFilter, SqlErr};
use uuid::Uuid;

use nutrivision_core::domain::User;
use nutrivision_core::error::RepoError;
use nutrivision_core::ports::{BaseRepository, UserRepository};
use nutrivision_core::validation::mask_email;

use super::entity::user::{self, ActiveModel, Entity as UserEntity};

/// PostgreSQL-backed user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn find_one(&self, condition: Condition) -> Result<Option<User>, RepoError> {
        UserEntity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(User::try_from)
            .transpose()
    }
}

fn query_error(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn write_error(e: DbErr) -> RepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            RepoError::Constraint("Username or email already taken.".to_string())
        }
        _ => query_error(e),
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(User::try_from)
            .transpose()
    }

    /// Upsert keyed on `id`; unique username/email still apply.
    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let active: ActiveModel = entity.clone().try_into()?;

        UserEntity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::Profile,
                        user::Column::ChatHistory,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        tracing::debug!(user_id = %entity.id, "User saved");
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        self.find_one(Condition::all().add(user::Column::Email.eq(email.trim())))
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.find_one(Condition::all().add(user::Column::Username.eq(username.trim())))
            .await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        let login = login.trim();
        self.find_one(
            Condition::any()
                .add(user::Column::Email.eq(login))
                .add(user::Column::Username.eq(login)),
        )
        .await
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = UserEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::warn!(removed = result.rows_affected, "All users deleted");
        Ok(result.rows_affected)
    }
}
