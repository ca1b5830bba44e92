use crate::domain::error::TranslateError;
use crate::domain::model::{AppMode, Translation};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;
use tokio_rusqlite::{params, Connection};
use zstd::stream::{decode_all, encode_all};

pub async fn init_database(db_path: &Path) -> Result<Connection, TranslateError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    create_schema(&db).await?;
    Ok(db)
}

/// In-memory database, used by tests and `--nocache` runs.
pub async fn init_memory_database() -> Result<Connection, TranslateError> {
    let db = Connection::open_in_memory().await?;
    create_schema(&db).await?;
    Ok(db)
}

async fn create_schema(db: &Connection) -> Result<(), TranslateError> {
    db.call(|conn| -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                key TEXT PRIMARY KEY,
                mode TEXT NOT NULL,
                model TEXT NOT NULL,
                data BLOB NOT NULL,
                compressed_size INTEGER NOT NULL,
                original_size INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_translations_created ON translations(created_at)",
            [],
        )?;

        Ok(())
    })
    .await?;

    Ok(())
}

/// Cache key: the same text under a different prompt or model is a different entry.
pub fn cache_key(mode: AppMode, model: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(mode.as_str());
    hasher.update([0u8]);
    hasher.update(model);
    hasher.update([0u8]);
    hasher.update(text);
    hex::encode(hasher.finalize())
}

pub async fn query_cache(db: &Connection, key: &str) -> Result<Option<Translation>, TranslateError> {
    use rusqlite::OptionalExtension;

    let key = key.to_string();
    let compressed = db
        .call(move |conn| -> rusqlite::Result<Option<Vec<u8>>> {
            conn.query_row(
                "SELECT data FROM translations WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await?;

    let Some(compressed) = compressed else {
        return Ok(None);
    };

    let decoded = tokio::task::spawn_blocking(move || -> Result<Translation, TranslateError> {
        let decompressed = decode_all(Cursor::new(&compressed))?;
        Ok(serde_json::from_slice(&decompressed)?)
    })
    .await
    .map_err(|e| TranslateError::Io(std::io::Error::other(format!("Task join error: {}", e))))?;

    match decoded {
        Ok(translation) => Ok(Some(translation)),
        Err(e) => {
            // A corrupt row is a miss, not a failure.
            tracing::warn!("Discarding unreadable cache entry: {}", e);
            Ok(None)
        }
    }
}

pub async fn insert_cache(
    db: &Connection,
    key: &str,
    translation: &Translation,
) -> Result<(), TranslateError> {
    let serialized = serde_json::to_vec(translation)?;
    let compressed = encode_all(Cursor::new(&serialized), 0)?;
    let now = chrono::Utc::now().timestamp();

    let key = key.to_string();
    let mode = translation.mode.as_str();
    let model = translation.model.clone();
    let compressed_len = compressed.len();
    let original_len = serialized.len();

    db.call(move |conn| -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT OR REPLACE INTO translations (key, mode, model, data, compressed_size, original_size, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![key, mode, model, compressed, compressed_len, original_len, now],
        )
    })
    .await?;

    Ok(())
}

pub async fn count_entries(db: &Connection) -> Result<usize, TranslateError> {
    let count: i64 = db
        .call(|conn| -> rusqlite::Result<i64> {
            conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))
        })
        .await?;

    Ok(count as usize)
}

pub async fn clear_cache(db: &Connection) -> Result<usize, TranslateError> {
    let removed = db
        .call(|conn| -> rusqlite::Result<usize> { conn.execute("DELETE FROM translations", []) })
        .await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TranslationSource;

    fn sample() -> Translation {
        Translation::new(
            "Sehr geehrte Damen und Herren".to_string(),
            "Dear Sir or Madam".to_string(),
            AppMode::Text,
            "test-model".to_string(),
        )
    }

    #[test]
    fn cache_key_depends_on_mode_model_and_text() {
        let base = cache_key(AppMode::Text, "m", "Hallo");
        assert_eq!(base, cache_key(AppMode::Text, "m", "Hallo"));
        assert_ne!(base, cache_key(AppMode::Document, "m", "Hallo"));
        assert_ne!(base, cache_key(AppMode::Text, "other", "Hallo"));
        assert_ne!(base, cache_key(AppMode::Text, "m", "Hallo!"));
        assert_eq!(base.len(), 64);
    }

    #[tokio::test]
    async fn insert_then_query_returns_translation() {
        let db = init_memory_database().await.unwrap();
        let key = cache_key(AppMode::Text, "test-model", "Sehr geehrte Damen und Herren");

        assert!(query_cache(&db, &key).await.unwrap().is_none());

        insert_cache(&db, &key, &sample()).await.unwrap();
        let cached = query_cache(&db, &key).await.unwrap().unwrap();
        assert_eq!(cached.output, "Dear Sir or Madam");
        assert_eq!(cached.source, TranslationSource::Online);
        assert_eq!(count_entries(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_replaces_existing_entry() {
        let db = init_memory_database().await.unwrap();
        let key = cache_key(AppMode::Text, "test-model", "x");

        insert_cache(&db, &key, &sample()).await.unwrap();
        let mut updated = sample();
        updated.output = "Ladies and gentlemen".to_string();
        insert_cache(&db, &key, &updated).await.unwrap();

        assert_eq!(count_entries(&db).await.unwrap(), 1);
        let cached = query_cache(&db, &key).await.unwrap().unwrap();
        assert_eq!(cached.output, "Ladies and gentlemen");
    }

    #[tokio::test]
    async fn clear_removes_all_entries() {
        let db = init_memory_database().await.unwrap();
        insert_cache(&db, "a", &sample()).await.unwrap();
        insert_cache(&db, "b", &sample()).await.unwrap();

        assert_eq!(clear_cache(&db).await.unwrap(), 2);
        assert_eq!(count_entries(&db).await.unwrap(), 0);
    }
}
