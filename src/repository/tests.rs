//! Repository Integration Tests
//!
//! Tests for the SQLite repositories with an in-memory database.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, DreamPatch, NewDream, Symbol};
    use crate::repository::{
        init_db, DreamStore, SqliteDreamRepository, SqliteSymbolRepository, SymbolStore,
    };
    use std::path::PathBuf;

    async fn setup_test_db() -> (SqliteDreamRepository, SqliteSymbolRepository) {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        (
            SqliteDreamRepository::new(db_state.connection()),
            SqliteSymbolRepository::new(db_state.connection()),
        )
    }

    fn new_dream(text: &str) -> NewDream {
        NewDream::new(text, "تفسير").expect("valid dream")
    }

    #[tokio::test]
    async fn test_insert_dream() {
        let (repo, _) = setup_test_db().await;

        let created = repo.insert("u1", &new_dream("رأيت البحر")).await.expect("Failed to insert");

        assert!(!created.id.is_empty());
        assert_eq!(created.user_id, "u1");
        assert_eq!(created.dream_text, "رأيت البحر");
        assert!(!created.is_favorite);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_text() {
        let (repo, _) = setup_test_db().await;
        let blank = NewDream {
            dream_text: "  ".to_string(),
            interpretation: String::new(),
            is_favorite: false,
        };
        let err = repo.insert("u1", &blank).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_find_by_id_roundtrip() {
        let (repo, _) = setup_test_db().await;

        let created = repo.insert("u1", &new_dream("Find me")).await.unwrap();
        let found = repo.find_by_id(&created.id).await.expect("Find failed");

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_list_scoped_to_user_newest_first() {
        let (repo, _) = setup_test_db().await;

        let first = repo.insert("u1", &new_dream("first")).await.unwrap();
        repo.insert("u2", &new_dream("someone else")).await.unwrap();
        let second = repo.insert("u1", &new_dream("second")).await.unwrap();

        let dreams = repo.list("u1").await.expect("List failed");
        assert_eq!(dreams.len(), 2);
        assert_eq!(dreams[0].id, second.id);
        assert_eq!(dreams[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_favorite() {
        let (repo, _) = setup_test_db().await;

        let created = repo.insert("u1", &new_dream("star me")).await.unwrap();
        let updated = repo
            .update(&created.id, DreamPatch::favorite(true))
            .await
            .expect("Update failed");

        assert!(updated.is_favorite);
        assert_eq!(updated.interpretation, created.interpretation);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (repo, _) = setup_test_db().await;
        let err = repo.update("nope", DreamPatch::favorite(true)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_dream() {
        let (repo, _) = setup_test_db().await;

        let created = repo.insert("u1", &new_dream("To delete")).await.unwrap();
        repo.delete(&created.id).await.expect("Delete failed");

        let found = repo.find_by_id(&created.id).await.expect("Find failed");
        assert!(found.is_none());
        assert!(repo.delete(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_symbol_import_and_list_sorted() {
        let (_, symbols) = setup_test_db().await;

        let mut cat = Symbol::new("قطة", "حيوانات");
        cat.meanings.positive.push("رزق".to_string());
        let sea = Symbol::new("بحر", "طبيعة");

        assert_eq!(symbols.import(&[cat.clone(), sea.clone()]).await.unwrap(), 2);
        // re-import replaces rather than duplicates
        symbols.import(&[cat.clone()]).await.unwrap();

        let listed = symbols.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].symbol_name, "بحر");
        assert_eq!(listed[1], cat);
    }

    #[tokio::test]
    async fn test_unreadable_meanings_read_as_empty() {
        let db_state = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        {
            let conn = db_state.connection();
            let conn = conn.lock().await;
            conn.execute(
                "INSERT INTO dream_symbols (symbol_name, category, meanings) VALUES ('نار', 'عناصر', '{broken')",
                [],
            )
            .unwrap();
        }
        let symbols = SqliteSymbolRepository::new(db_state.connection());

        let listed = symbols.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "عناصر");
        assert!(listed[0].meanings.positive.is_empty());
        assert!(listed[0].meanings.negative.is_empty());
    }
}
