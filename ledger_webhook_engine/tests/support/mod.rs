use ledger_webhook_engine::SqliteDatabase;
use log::*;

/// Create a fresh, fully migrated store in the system temp directory. Every call gets its own database file, so
/// tests can run in parallel without interfering with each other.
pub async fn prepare_test_store() -> SqliteDatabase {
    let _ = env_logger::try_init();
    let url = random_db_path();
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to test database");
    info!("🚀️ Test store ready at {url}");
    db
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/lwg_test_store_{}.db", dir.display(), rand::random::<u64>())
}
