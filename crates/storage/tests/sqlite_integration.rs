use chrono::Duration;
use quiz_core::model::BestScore;
use quiz_core::time::fixed_now;
use storage::repository::{BestScoreRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_starts_without_best_score() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_empty?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_best().await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_best_score_upserts_single_row() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let first = BestScore::new(60, fixed_now()).unwrap();
    repo.save_best(&first).await.unwrap();

    let later = fixed_now() + Duration::minutes(10);
    let second = BestScore::new(90, later).unwrap();
    repo.save_best(&second).await.unwrap();

    let stored = repo.get_best().await.unwrap().expect("best score stored");
    assert_eq!(stored.percent(), 90);
    assert_eq!(stored.achieved_at(), later);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM best_score")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn storage_facade_wires_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_facade?mode=memory&cache=shared")
        .await
        .expect("storage");

    let score = BestScore::new(75, fixed_now()).unwrap();
    storage.best_scores.save_best(&score).await.unwrap();
    assert_eq!(storage.best_scores.get_best().await.unwrap(), Some(score));
}
