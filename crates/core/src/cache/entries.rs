//! `CacheStorage` implementation over SQLite.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::compute_entry_hash;
use super::storage::CacheStorage;
use crate::{Error, Response};

const UPSERT_ENTRY: &str = "INSERT INTO cache_entries (
        hash, cache_name, request_key, url, status, content_type, headers_json, body, stored_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(hash) DO UPDATE SET
        url = excluded.url,
        status = excluded.status,
        content_type = excluded.content_type,
        headers_json = excluded.headers_json,
        body = excluded.body,
        stored_at = excluded.stored_at";

fn ensure_cache(conn: &rusqlite::Connection, name: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
        params![name, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn upsert_entry(conn: &rusqlite::Connection, name: &str, key: &str, response: &Response) -> Result<(), Error> {
    let headers_json = serde_json::to_string(&response.headers)
        .map_err(|e| Error::InvalidInput(format!("failed to serialize headers: {e}")))?;
    conn.execute(
        UPSERT_ENTRY,
        params![
            compute_entry_hash(name, key),
            name,
            key,
            &response.url,
            response.status,
            &response.content_type,
            headers_json,
            &response.body,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> { ensure_cache(conn, &name) })
            .await
            .map_err(Error::from)
    }

    async fn has(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM caches WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY id ASC")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM caches WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn match_request(&self, name: &str, key: &str) -> Result<Option<Response>, Error> {
        let hash = compute_entry_hash(name, key);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let result = conn.query_row(
                    "SELECT url, status, content_type, headers_json, body
                     FROM cache_entries WHERE hash = ?1",
                    params![hash],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, u16>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Vec<u8>>(4)?,
                        ))
                    },
                );

                let (url, status, content_type, headers_json, body) = match result {
                    Ok(row) => row,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };

                let headers = serde_json::from_str(&headers_json)
                    .map_err(|e| Error::Storage(format!("failed to decode stored headers: {e}")))?;
                Ok(Some(Response { url, status, content_type, headers, body }))
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, name: &str, key: &str, response: &Response) -> Result<(), Error> {
        let (name, key, response) = (name.to_string(), key.to_string(), response.clone());
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_cache(&tx, &name)?;
                upsert_entry(&tx, &name, &key, &response)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn put_all(&self, name: &str, entries: &[(String, Response)]) -> Result<(), Error> {
        let name = name.to_string();
        let entries = entries.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_cache(&tx, &name)?;
                for (key, response) in &entries {
                    upsert_entry(&tx, &name, key, response)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT request_key FROM cache_entries WHERE cache_name = ?1 ORDER BY rowid ASC")?;
                let keys = stmt
                    .query_map(params![name], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1: &str = "developmomentum-offline-v1.0.0";
    const V2: &str = "developmomentum-offline-v1.0.1";

    fn page(body: &str) -> Response {
        Response::new("https://example.com/offline.html", "text/html", body)
    }

    #[tokio::test]
    async fn test_open_creates_once() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(!db.has(V1).await.unwrap());
        db.open(V1).await.unwrap();
        db.open(V1).await.unwrap();
        assert!(db.has(V1).await.unwrap());
        assert_eq!(db.keys().await.unwrap(), vec![V1.to_string()]);
    }

    #[tokio::test]
    async fn test_keys_in_creation_order() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open(V2).await.unwrap();
        db.open(V1).await.unwrap();
        assert_eq!(db.keys().await.unwrap(), vec![V2.to_string(), V1.to_string()]);
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(V1, "https://example.com/offline.html", &page("offline"))
            .await
            .unwrap();

        let hit = db
            .match_request(V1, "https://example.com/offline.html")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.text(), "offline");
        assert_eq!(hit.content_type.as_deref(), Some("text/html"));
        assert_eq!(hit.headers, vec![("content-type".to_string(), "text/html".to_string())]);
    }

    #[tokio::test]
    async fn test_match_is_scoped_to_cache() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(V1, "https://example.com/offline.html", &page("old"))
            .await
            .unwrap();

        let miss = db.match_request(V2, "https://example.com/offline.html").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_put_all_upserts_without_duplicates() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let entries = vec![
            ("https://example.com/a.css".to_string(), page("a")),
            ("https://example.com/b.js".to_string(), page("b")),
        ];
        db.put_all(V1, &entries).await.unwrap();
        db.put_all(V1, &entries).await.unwrap();

        assert_eq!(
            db.entry_keys(V1).await.unwrap(),
            vec!["https://example.com/a.css".to_string(), "https://example.com/b.js".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(V1, "https://example.com/a.css", &page("a")).await.unwrap();
        db.put(V2, "https://example.com/a.css", &page("a2")).await.unwrap();

        assert!(db.delete(V1).await.unwrap());
        assert!(!db.delete(V1).await.unwrap());

        assert!(db.entry_keys(V1).await.unwrap().is_empty());
        assert_eq!(db.keys().await.unwrap(), vec![V2.to_string()]);
        assert!(db.match_request(V2, "https://example.com/a.css").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_match_rejects_corrupt_headers() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(V1, "https://example.com/offline.html", &page("offline"))
            .await
            .unwrap();
        db.conn
            .call(|conn| -> Result<(), Error> {
                conn.execute("UPDATE cache_entries SET headers_json = 'not json'", [])?;
                Ok(())
            })
            .await
            .unwrap();

        let err = db
            .match_request(V1, "https://example.com/offline.html")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().starts_with("CACHE_ERROR"));
    }
}
