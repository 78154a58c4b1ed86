//! Handler tests over the in-memory state: every endpoint behaves like
//! the real thing minus the Postgres connection.

use std::path::Path;
use std::time::Duration;

use actix_web::{App, test, web};
use serde_json::json;
use uuid::Uuid;

use atrium_core::domain::Media;
use atrium_core::ports::{BaseRepository, MediaRepository, RecentCache};
use atrium_shared::ErrorResponse;
use atrium_shared::dto::{
    CommentListBody, CommentMutationBody, LiveCommentListBody, MediaMutationBody, PostDetailBody,
    PostListBody, PostMutationBody, ReadCountBody, SuccessBody, UploadBody,
};

use crate::config::{AppConfig, UploadConfig};
use crate::state::AppState;

fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: None,
        upload: UploadConfig {
            dir: upload_dir.to_path_buf(),
            public_prefix: "/uploads".to_string(),
        },
        live_cache_ttl: Duration::from_secs(5),
    }
}

macro_rules! spawn_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(super::configure_routes),
        )
        .await
    };
}

fn post_payload(title: &str, content: &str) -> serde_json::Value {
    json!({
        "title": title,
        "content": content,
        "category": "tech",
        "author": "ana",
    })
}

#[actix_web::test]
async fn create_with_any_empty_field_is_rejected_without_a_write() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let payloads = [
        json!({"title": "", "content": "c", "category": "tech", "author": "ana"}),
        json!({"title": "t", "content": " ", "category": "tech", "author": "ana"}),
        json!({"title": "t", "content": "c", "category": "", "author": "ana"}),
        json!({"title": "t", "content": "c", "category": "tech", "author": ""}),
    ];
    let expected_fields = ["title", "content", "category", "author"];

    for (payload, field) in payloads.iter().zip(expected_fields) {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.detail.unwrap().contains(field));
    }

    // No post was created by any of the rejected requests.
    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: PostListBody = test::call_and_read_body_json(&app, req).await;
    assert!(body.posts.is_empty());
}

#[actix_web::test]
async fn malformed_json_still_yields_a_json_error_body() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, 400);
}

#[actix_web::test]
async fn created_post_carries_derived_fields() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    // "# Heading\n\n" is 11 chars; 1200 in total at 300 chars/minute.
    let content = format!("# Heading\n\n{}", "x".repeat(1189));
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", &content))
        .to_request();
    let body: PostMutationBody = test::call_and_read_body_json(&app, req).await;

    assert!(body.success);
    // 1200 chars of content at 300 chars/minute
    assert_eq!(body.post.read_time, "4 min");
    assert!(body.post.excerpt.ends_with("..."));
    assert!(!body.post.excerpt.contains('#'));

    // Detail fetch returns the full content plus empty comment/media lists.
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?id={}", body.post.id))
        .to_request();
    let detail: PostDetailBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail.post.post.content, content.trim());
    assert!(detail.post.comments.is_empty());
    assert!(detail.post.media.is_empty());
}

#[actix_web::test]
async fn update_rederives_and_unknown_id_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", "short"))
        .to_request();
    let created: PostMutationBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.post.read_time, "1 min");

    let req = test::TestRequest::put()
        .uri("/api/posts")
        .set_json(json!({
            "id": created.post.id,
            "title": "Hello",
            "content": "y".repeat(700),
            "category": "life",
            "author": "ana",
        }))
        .to_request();
    let updated: PostMutationBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.post.read_time, "3 min");
    assert_eq!(updated.post.id, created.post.id);
    assert_eq!(updated.post.created_at, created.post.created_at);
    assert!(updated.post.updated_at >= created.post.updated_at);

    let req = test::TestRequest::put()
        .uri("/api/posts")
        .set_json(json!({
            "id": Uuid::new_v4(),
            "title": "t",
            "content": "c",
            "category": "tech",
            "author": "ana",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn list_is_newest_first_and_counts_follow_writes() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_payload(title, "content"))
            .to_request();
        let body: PostMutationBody = test::call_and_read_body_json(&app, req).await;
        ids.push(body.post.id);
    }

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let list: PostListBody = test::call_and_read_body_json(&app, req).await;
    let listed: Vec<Uuid> = list.posts.iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

    // A new comment shows up in the count immediately.
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({"postId": ids[0], "author": "bo", "content": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let list: PostListBody = test::call_and_read_body_json(&app, req).await;
    let first = list.posts.iter().find(|p| p.id == ids[0]).unwrap();
    assert_eq!(first.comment_count, 1);
}

#[actix_web::test]
async fn comments_are_validated_and_listed_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", "content"))
        .to_request();
    let created: PostMutationBody = test::call_and_read_body_json(&app, req).await;
    let post_id = created.post.id;

    // Empty content is rejected and leaves the list unchanged.
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({"postId": post_id, "author": "bo", "content": "  "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments?postId={}", post_id))
        .to_request();
    let list: CommentListBody = test::call_and_read_body_json(&app, req).await;
    assert!(list.comments.is_empty());

    for content in ["earlier", "later"] {
        let req = test::TestRequest::post()
            .uri("/api/comments")
            .set_json(json!({"postId": post_id, "author": "bo", "content": content}))
            .to_request();
        let body: CommentMutationBody = test::call_and_read_body_json(&app, req).await;
        assert!(body.success);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments?postId={}", post_id))
        .to_request();
    let list: CommentListBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.comments.len(), 2);
    assert_eq!(list.comments[0].content, "later");
    assert_eq!(list.comments[1].content, "earlier");
}

#[actix_web::test]
async fn commenting_on_a_missing_post_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({"postId": Uuid::new_v4(), "author": "bo", "content": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn delete_cascades_and_repeating_it_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", "content"))
        .to_request();
    let created: PostMutationBody = test::call_and_read_body_json(&app, req).await;
    let post_id = created.post.id;

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(json!({"postId": post_id, "author": "bo", "content": "hi"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    state
        .media
        .insert(Media::new(
            "image/png",
            "/uploads/a.png",
            "a.png",
            "a.png",
            Some(post_id),
        ))
        .await
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts?id={}", post_id))
        .to_request();
    let body: SuccessBody = test::call_and_read_body_json(&app, req).await;
    assert!(body.success);

    // The post and everything that existed because of it are gone.
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?id={}", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments?postId={}", post_id))
        .to_request();
    let list: CommentListBody = test::call_and_read_body_json(&app, req).await;
    assert!(list.comments.is_empty());

    assert!(
        state
            .media
            .find_by_post_id(post_id)
            .await
            .unwrap()
            .is_empty()
    );

    // Idempotence: a second delete reports NotFound, not success.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts?id={}", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn delete_without_id_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::delete().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Malformed ids are caught by the extractor, with the same JSON shape.
    let req = test::TestRequest::delete()
        .uri("/api/posts?id=not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, 400);
}

#[actix_web::test]
async fn upload_then_attach_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", "content"))
        .to_request();
    let created: PostMutationBody = test::call_and_read_body_json(&app, req).await;
    let post_id = created.post.id;

    // Draft upload: no owning post yet.
    let media = state
        .media
        .insert(Media::new(
            "image/png",
            "/uploads/draft.png",
            "draft.png",
            "draft.png",
            None,
        ))
        .await
        .unwrap();
    assert!(media.post_id.is_none());

    let req = test::TestRequest::patch()
        .uri(&format!("/api/media/{}", media.id))
        .set_json(json!({"postId": post_id}))
        .to_request();
    let body: MediaMutationBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.media.post_id, Some(post_id));

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?id={}", post_id))
        .to_request();
    let detail: PostDetailBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail.post.media.len(), 1);

    // Attaching again to the same post changes nothing.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/media/{}", media.id))
        .set_json(json!({"postId": post_id}))
        .to_request();
    let body: MediaMutationBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.media.post_id, Some(post_id));

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?id={}", post_id))
        .to_request();
    let detail: PostDetailBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail.post.media.len(), 1);

    // Unknown media or post: 404 either way.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/media/{}", Uuid::new_v4()))
        .set_json(json!({"postId": post_id}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/media/{}", media.id))
        .set_json(json!({"postId": Uuid::new_v4()}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

fn multipart_payload(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(
        format!(
            "--XB\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: {}\r\n\r\n",
            filename, content_type
        )
        .as_bytes(),
    );
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n--XB--\r\n");
    buf
}

#[actix_web::test]
async fn upload_stores_bytes_and_records_an_unattached_row() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(("content-type", "multipart/form-data; boundary=XB"))
        .set_payload(multipart_payload("pic.png", "image/png", b"fake-png-bytes"))
        .to_request();
    let body: UploadBody = test::call_and_read_body_json(&app, req).await;

    assert!(body.success);
    assert!(body.file.url.starts_with("/uploads/"));
    assert_eq!(body.file.media_type, "image/png");
    assert!(body.file.filename.ends_with(".png"));

    let stored = tokio::fs::read(dir.path().join(&body.file.filename))
        .await
        .unwrap();
    assert_eq!(stored, b"fake-png-bytes");

    let media = state.media.find_by_id(body.file.id).await.unwrap().unwrap();
    assert!(media.post_id.is_none());
    assert_eq!(media.original_name, "pic.png");
}

#[actix_web::test]
async fn upload_of_an_unsupported_type_is_rejected_without_a_row() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(("content-type", "multipart/form-data; boundary=XB"))
        .set_payload(multipart_payload("doc.pdf", "application/pdf", b"%PDF"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.unwrap().contains("unsupported media type"));
}

#[actix_web::test]
async fn read_count_increments_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(post_payload("Hello", "content"))
        .to_request();
    let created: PostMutationBody = test::call_and_read_body_json(&app, req).await;

    for expected in 1..=2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/read?id={}", created.post.id))
            .to_request();
        let body: ReadCountBody = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.read_count, expected);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/read?id={}", Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn live_stream_serves_cached_results_and_invalidates_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_memory(&test_config(dir.path()));
    let app = spawn_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/live")
        .set_json(json!({"text": "hello", "name": "bo"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // First read fills the cache.
    let req = test::TestRequest::get().uri("/api/live").to_request();
    let list: LiveCommentListBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.comments.len(), 1);
    assert!(state.live_cache.get().await.is_some());

    // A write invalidates it eagerly; the next poll sees the new entry.
    let req = test::TestRequest::post()
        .uri("/api/live")
        .set_json(json!({"text": "again", "name": "bo"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
    assert!(state.live_cache.get().await.is_none());

    let req = test::TestRequest::get().uri("/api/live").to_request();
    let list: LiveCommentListBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.comments.len(), 2);
    assert_eq!(list.comments[0].text, "again");

    // Empty text never reaches the store.
    let req = test::TestRequest::post()
        .uri("/api/live")
        .set_json(json!({"text": "", "name": "bo"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::delete().uri("/api/live").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/api/live").to_request();
    let list: LiveCommentListBody = test::call_and_read_body_json(&app, req).await;
    assert!(list.comments.is_empty());
}
