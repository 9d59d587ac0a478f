use photoshare::db;
use photoshare::error::InteractionError;
use photoshare::interactions::{Actor, Interactions, NewComment};
use photoshare::models::{CreatePhoto, DELETED_CONTENT_PLACEHOLDER, LikeTarget};

async fn engine() -> Interactions {
    let pool = db::init_memory_db().await.expect("in-memory database");
    Interactions::new(pool)
}

fn photo_input(url: &str) -> CreatePhoto {
    CreatePhoto {
        image_url: url.to_string(),
        caption: None,
    }
}

fn comment_input(photo_id: i64, author_id: i64, content: &str, parent: Option<i64>) -> NewComment {
    NewComment {
        photo_id,
        author_id,
        content: content.to_string(),
        parent_comment_id: parent,
    }
}

#[tokio::test]
async fn comment_thread_lifecycle_keeps_counts_consistent() {
    let engine = engine().await;
    let photo = engine.create_photo(1, &photo_input("p.jpg")).await.unwrap();
    assert_eq!(photo.comments_count, 0);

    let c1 = engine
        .create_comment(&comment_input(photo.id, 2, "first!", None))
        .await
        .unwrap();
    assert_eq!(engine.get_photo(photo.id).await.unwrap().comments_count, 1);

    let c2 = engine
        .create_comment(&comment_input(photo.id, 3, "agreed", Some(c1.id)))
        .await
        .unwrap();
    assert_eq!(c2.parent_comment_id, Some(c1.id));
    assert_eq!(engine.get_photo(photo.id).await.unwrap().comments_count, 1);

    engine
        .delete_comment(c1.id, &Actor { id: 2, is_admin: false })
        .await
        .unwrap();

    let thread = engine.list_comments(photo.id).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert!(thread.iter().all(|c| c.is_deleted));
    assert!(thread.iter().all(|c| c.content == DELETED_CONTENT_PLACEHOLDER));
    assert_eq!(engine.get_photo(photo.id).await.unwrap().comments_count, 0);
}

#[tokio::test]
async fn like_toggle_round_trip_on_a_photo() {
    let engine = engine().await;
    let photo = engine.create_photo(1, &photo_input("p.jpg")).await.unwrap();

    let on = engine
        .toggle_like(7, LikeTarget::Photo, photo.id, None)
        .await
        .unwrap();
    assert!(on.liked);
    assert_eq!(on.likes_count, 1);

    let view = engine.get_photo(photo.id).await.unwrap();
    assert_eq!(view.likes_count, 1);
    assert_eq!(view.likes, vec![7]);

    let off = engine
        .toggle_like(7, LikeTarget::Photo, photo.id, None)
        .await
        .unwrap();
    assert!(!off.liked);
    assert_eq!(off.likes_count, 0);

    let view = engine.get_photo(photo.id).await.unwrap();
    assert_eq!(view.likes_count, 0);
    assert!(view.likes.is_empty());
}

#[tokio::test]
async fn comment_likes_count_on_the_comment_not_the_photo() {
    let engine = engine().await;
    let photo = engine.create_photo(1, &photo_input("p.jpg")).await.unwrap();
    let comment = engine
        .create_comment(&comment_input(photo.id, 2, "like me", None))
        .await
        .unwrap();

    let status = engine
        .toggle_like(7, LikeTarget::Comment, comment.id, Some(photo.id))
        .await
        .unwrap();
    assert!(status.liked);
    assert_eq!(status.likes_count, 1);

    assert_eq!(engine.get_photo(photo.id).await.unwrap().likes_count, 0);
    assert_eq!(engine.get_comment(comment.id).await.unwrap().likes_count, 1);
    assert!(
        engine
            .is_liked_by_user(7, LikeTarget::Comment, comment.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn editing_rules_are_enforced_through_the_facade() {
    let engine = engine().await;
    let photo = engine.create_photo(1, &photo_input("p.jpg")).await.unwrap();
    let comment = engine
        .create_comment(&comment_input(photo.id, 2, "draft", None))
        .await
        .unwrap();

    let err = engine.edit_comment(comment.id, "stolen", 9).await.unwrap_err();
    assert!(matches!(err, InteractionError::Authorization(_)));

    let edited = engine.edit_comment(comment.id, "final", 2).await.unwrap();
    assert_eq!(edited.content, "final");
    assert!(edited.is_edited);

    engine
        .delete_comment(comment.id, &Actor { id: 2, is_admin: false })
        .await
        .unwrap();
    let err = engine.edit_comment(comment.id, "zombie", 2).await.unwrap_err();
    assert!(matches!(err, InteractionError::Conflict(_)));
}

#[tokio::test]
async fn user_like_history_survives_target_kind_filtering() {
    let engine = engine().await;
    let photo_a = engine.create_photo(1, &photo_input("a.jpg")).await.unwrap();
    let photo_b = engine.create_photo(1, &photo_input("b.jpg")).await.unwrap();
    let comment = engine
        .create_comment(&comment_input(photo_a.id, 2, "hi", None))
        .await
        .unwrap();

    engine.toggle_like(7, LikeTarget::Photo, photo_a.id, None).await.unwrap();
    engine.toggle_like(7, LikeTarget::Photo, photo_b.id, None).await.unwrap();
    engine
        .toggle_like(7, LikeTarget::Comment, comment.id, Some(photo_a.id))
        .await
        .unwrap();

    let all = engine.list_user_likes(7, None, 1, 10).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.likes.first().unwrap().target_type, LikeTarget::Comment);

    let photos_only = engine
        .list_user_likes(7, Some(LikeTarget::Photo), 1, 10)
        .await
        .unwrap();
    assert_eq!(photos_only.total, 2);

    // Un-liking removes the record from the history.
    engine.toggle_like(7, LikeTarget::Photo, photo_b.id, None).await.unwrap();
    let after = engine.list_user_likes(7, None, 1, 10).await.unwrap();
    assert_eq!(after.total, 2);
    assert!(after.likes.iter().all(|l| l.target_id != photo_b.id));
}

#[tokio::test]
async fn photo_deletion_cascades_across_the_interaction_graph() {
    let engine = engine().await;
    let photo = engine.create_photo(1, &photo_input("p.jpg")).await.unwrap();
    let comment = engine
        .create_comment(&comment_input(photo.id, 2, "soon gone", None))
        .await
        .unwrap();
    engine.toggle_like(7, LikeTarget::Photo, photo.id, None).await.unwrap();
    engine
        .toggle_like(8, LikeTarget::Comment, comment.id, Some(photo.id))
        .await
        .unwrap();

    engine
        .delete_photo(photo.id, &Actor { id: 1, is_admin: false })
        .await
        .unwrap();

    let err = engine.get_photo(photo.id).await.unwrap_err();
    assert!(matches!(err, InteractionError::NotFound(_)));
    let err = engine.get_comment(comment.id).await.unwrap_err();
    assert!(matches!(err, InteractionError::NotFound(_)));
    assert_eq!(engine.list_user_likes(7, None, 1, 10).await.unwrap().total, 0);
    assert_eq!(engine.list_user_likes(8, None, 1, 10).await.unwrap().total, 0);
}
