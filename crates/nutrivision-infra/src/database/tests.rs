use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;

use nutrivision_core::error::RepoError;
use nutrivision_core::ports::{BaseRepository, UserRepository};

use crate::database::entity::user;
use crate::database::postgres_repo::PostgresUserRepository;

fn model(username: &str) -> user::Model {
    let now = chrono::Utc::now();
    user::Model {
        id: uuid::Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{}@example.com", username),
        password_hash: "$argon2id$stub".to_owned(),
        profile: json!({
            "diet": "vegetarian",
            "healthConditions": [],
            "allergies": ["peanuts"],
            "favoriteDishes": ["falafel"],
            "dislikedDishes": []
        }),
        chat_history: json!([{ "role": "user", "content": "Is tofu healthy?" }]),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_user_by_login() {
    let row = model("alice");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_login("alice").await.unwrap().unwrap();

    assert_eq!(found.id, row.id);
    assert_eq!(found.profile.diet, "vegetarian");
    assert_eq!(found.profile.allergies, vec!["peanuts".to_string()]);
    assert_eq!(found.chat_history.len(), 1);
}

#[tokio::test]
async fn test_corrupt_profile_is_reported() {
    let mut row = model("bob");
    row.profile = json!("not an object");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result = repo.find_by_id(row.id).await;
    assert!(matches!(result, Err(RepoError::Corrupt(_))));
}

#[tokio::test]
async fn test_delete_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result = repo.delete(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_all_reports_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 3,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    assert_eq!(repo.delete_all().await.unwrap(), 3);
}
