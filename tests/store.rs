mod common;

use common::{new_quote, new_user, test_store};
use quotebook::{
    error::AppError,
    models::{
        quotes::{QuoteFilter, QuotePatch},
        users::UserPatch,
    },
};

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (store, _dir) = test_store().await;

    let first = store
        .create_user(new_user("johndoe", "john@example.com", Some(30)))
        .await
        .unwrap();
    assert!(first.id > 0);

    let err = store
        .create_user(new_user("johndoe", "other@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let second = store
        .create_user(new_user("janedoe", "jane@example.com", None))
        .await
        .unwrap();
    assert!(second.id > first.id);
    assert_eq!(store.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn get_after_create_returns_the_created_user() {
    let (store, _dir) = test_store().await;

    let created = store
        .create_user(new_user("johndoe", "john@example.com", Some(30)))
        .await
        .unwrap();
    let fetched = store.get_user(created.id).await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn invalid_user_is_rejected_before_insert() {
    let (store, _dir) = test_store().await;

    let err = store
        .create_user(new_user("johndoe", "john@example.com", Some(200)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_update_is_rejected_regardless_of_id() {
    let (store, _dir) = test_store().await;

    let user = store
        .create_user(new_user("johndoe", "john@example.com", None))
        .await
        .unwrap();

    for id in [user.id, 9999] {
        let err = store
            .update_user(id, UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

        let err = store
            .update_quote(id, QuotePatch::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    }
}

#[tokio::test]
async fn update_rewrites_only_supplied_fields() {
    let (store, _dir) = test_store().await;

    let user = store
        .create_user(new_user("johndoe", "john@example.com", Some(30)))
        .await
        .unwrap();

    let updated = store
        .update_user(
            user.id,
            UserPatch {
                email: Some("new@x.com".to_string()),
                age: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "new@x.com");
    assert_eq!(updated.age, Some(30));
    assert_eq!(updated.username, "johndoe");

    let cleared = store
        .update_user(
            user.id,
            UserPatch {
                email: None,
                age: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.email, "new@x.com");
    assert_eq!(cleared.age, None);
}

#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let (store, _dir) = test_store().await;

    let err = store
        .update_user(
            42,
            UserPatch {
                email: Some("new@x.com".to_string()),
                age: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleted_user_is_gone() {
    let (store, _dir) = test_store().await;

    let user = store
        .create_user(new_user("johndoe", "john@example.com", None))
        .await
        .unwrap();

    store.delete_user(user.id).await.unwrap();

    assert!(matches!(
        store.get_user(user.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_user(user.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn get_after_create_returns_the_created_quote() {
    let (store, _dir) = test_store().await;

    let created = store
        .create_quote(new_quote("Know thyself.", "Socrates", Some("Philosophy")))
        .await
        .unwrap();
    let fetched = store.get_quote(created.id, None).await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_of_missing_quote_is_not_found() {
    let (store, _dir) = test_store().await;

    let err = store
        .update_quote(
            42,
            QuotePatch {
                text: Some("Know thyself.".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn favorites_annotate_only_the_requesting_user() {
    let (store, _dir) = test_store().await;

    let liked = store
        .create_quote(new_quote("Know thyself.", "Socrates", Some("Philosophy")))
        .await
        .unwrap();
    let other = store
        .create_quote(new_quote("Stay hungry, stay foolish.", "Steve Jobs", None))
        .await
        .unwrap();
    assert!(!liked.is_favorite);

    store
        .set_favorite(liked.id, "user123".to_string())
        .await
        .unwrap();

    let for_user = store
        .list_quotes(QuoteFilter {
            category: None,
            user_id: Some("user123".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(for_user.len(), 2);
    assert!(for_user.iter().any(|q| q.id == liked.id && q.is_favorite));
    assert!(for_user.iter().any(|q| q.id == other.id && !q.is_favorite));

    let anonymous = store.list_quotes(QuoteFilter::default()).await.unwrap();
    assert!(anonymous.iter().all(|q| !q.is_favorite));

    let someone_else = store
        .get_quote(liked.id, Some("user456".to_string()))
        .await
        .unwrap();
    assert!(!someone_else.is_favorite);

    let owner = store
        .get_quote(liked.id, Some("user123".to_string()))
        .await
        .unwrap();
    assert!(owner.is_favorite);
}

#[tokio::test]
async fn set_favorite_is_idempotent() {
    let (store, _dir) = test_store().await;

    let quote = store
        .create_quote(new_quote("Know thyself.", "Socrates", None))
        .await
        .unwrap();

    store
        .set_favorite(quote.id, "user123".to_string())
        .await
        .unwrap();
    store
        .set_favorite(quote.id, "user123".to_string())
        .await
        .unwrap();

    assert_eq!(store.stats().await.unwrap().favorites, 1);

    let favorites = store.list_favorites("user123".to_string()).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites[0].is_favorite);
}

#[tokio::test]
async fn favorite_of_missing_quote_is_not_found() {
    let (store, _dir) = test_store().await;

    let err = store
        .set_favorite(7, "user123".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn clear_favorite_reports_whether_a_row_was_removed() {
    let (store, _dir) = test_store().await;

    let quote = store
        .create_quote(new_quote("Know thyself.", "Socrates", None))
        .await
        .unwrap();
    store
        .set_favorite(quote.id, "user123".to_string())
        .await
        .unwrap();

    assert!(store
        .clear_favorite(quote.id, "user123".to_string())
        .await
        .unwrap());
    assert!(!store
        .clear_favorite(quote.id, "user123".to_string())
        .await
        .unwrap());
    assert!(!store
        .clear_favorite(9999, "nobody".to_string())
        .await
        .unwrap());
}

#[tokio::test]
async fn deleting_a_quote_cascades_to_its_favorites() {
    let (store, _dir) = test_store().await;

    let doomed = store
        .create_quote(new_quote("Know thyself.", "Socrates", None))
        .await
        .unwrap();
    let kept = store
        .create_quote(new_quote("Stay hungry, stay foolish.", "Steve Jobs", None))
        .await
        .unwrap();

    for quote_id in [doomed.id, kept.id] {
        store
            .set_favorite(quote_id, "user123".to_string())
            .await
            .unwrap();
    }
    store
        .set_favorite(doomed.id, "user456".to_string())
        .await
        .unwrap();

    store.delete_quote(doomed.id).await.unwrap();

    let favorites = store.list_favorites("user123".to_string()).await.unwrap();
    assert_eq!(
        favorites.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![kept.id]
    );
    assert!(store
        .list_favorites("user456".to_string())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.stats().await.unwrap().favorites, 1);
}

#[tokio::test]
async fn categories_are_distinct_and_skip_null() {
    let (store, _dir) = test_store().await;

    for (text, category) in [
        ("Know thyself.", Some("Philosophy")),
        ("The unexamined life is not worth living.", Some("Philosophy")),
        ("Stay hungry, stay foolish.", Some("Motivation")),
        ("Hello, world.", None),
    ] {
        store
            .create_quote(new_quote(text, "Someone", category))
            .await
            .unwrap();
    }

    let categories = store.list_categories().await.unwrap();
    assert_eq!(categories, vec!["Motivation", "Philosophy"]);

    let philosophy = store
        .list_quotes(QuoteFilter {
            category: Some("Philosophy".to_string()),
            user_id: None,
        })
        .await
        .unwrap();
    assert_eq!(philosophy.len(), 2);
}

#[tokio::test]
async fn quote_update_can_clear_optional_fields() {
    let (store, _dir) = test_store().await;

    let quote = store
        .create_quote(new_quote("Know thyself.", "Socrates", Some("Philosophy")))
        .await
        .unwrap();

    let updated = store
        .update_quote(
            quote.id,
            QuotePatch {
                author: Some("Thales".to_string()),
                category: Some(None),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.author, "Thales");
    assert_eq!(updated.text, "Know thyself.");
    assert_eq!(updated.category, None);
    assert!(store.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn batch_insert_is_all_or_nothing_on_validation() {
    let (store, _dir) = test_store().await;

    let err = store
        .create_quotes(vec![
            new_quote("Know thyself.", "Socrates", None),
            new_quote("   ", "Nobody", None),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store
        .list_quotes(QuoteFilter::default())
        .await
        .unwrap()
        .is_empty());

    let created = store
        .create_quotes(vec![
            new_quote("Know thyself.", "Socrates", None),
            new_quote("Stay hungry, stay foolish.", "Steve Jobs", None),
        ])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].author, "Socrates");
    assert_eq!(created[1].author, "Steve Jobs");
    assert!(created[0].id < created[1].id);
}

#[tokio::test]
async fn migrations_are_reentrant() {
    let (store, _dir) = test_store().await;

    store.migrate().await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!((stats.users, stats.quotes, stats.favorites), (0, 0, 0));
}
