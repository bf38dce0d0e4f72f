use std::sync::Mutex;

use axum::http::HeaderValue;
use notes_client::{
    ApiClient, ClientError, NoteDraft, NotesApi, NotesView, Outcome, Prompter, SortDirection,
};
use notes_core::{DbTarget, SharedDb};
use notes_server::{create_app, AppState};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = create_app(
        AppState::new(SharedDb::new(DbTarget::Memory)),
        HeaderValue::from_static("http://localhost:3000"),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/notes/")
}

#[derive(Default)]
struct AcceptAll {
    alerts: Mutex<Vec<String>>,
}

impl Prompter for AcceptAll {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

#[tokio::test]
async fn client_crud_against_live_server() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(&base_url).expect("client");

    assert!(client.fetch_notes().await.expect("list").is_empty());

    let created = client
        .create_note(&NoteDraft::new("Groceries", "Milk, eggs"))
        .await
        .expect("create");
    assert_eq!(created.title, "Groceries");
    assert!(!created.id.is_empty());

    let updated = client
        .update_note(&created.id, &NoteDraft::new("Groceries", "Milk, eggs, bread"))
        .await
        .expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.content, "Milk, eggs, bread");
    assert_eq!(updated.created_at, created.created_at);

    let confirmation = client.delete_note(&created.id).await.expect("delete");
    assert_eq!(confirmation.message, "Note deleted successfully");

    match client.delete_note(&created.id).await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, format!("Note with ID {} not found", created.id));
        }
        other => panic!("expected 404, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_errors_surface_as_server_errors() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(&base_url).expect("client");

    let err = client
        .create_note(&NoteDraft::new("   ", "body"))
        .await
        .expect_err("blank title");
    assert!(matches!(err, ClientError::Server { status: 400, .. }));
    assert!(client.fetch_notes().await.expect("list").is_empty());
}

#[tokio::test]
async fn view_scenario_against_live_server() {
    let base_url = spawn_server().await;
    let view = NotesView::new(ApiClient::new(&base_url).expect("client"), AcceptAll::default());
    assert_eq!(view.load().await, Outcome::Applied);

    for (title, content) in [("Groceries", "Milk, eggs"), ("Work", "Finish report")] {
        view.open_add();
        view.set_title(title);
        view.set_content(content);
        assert_eq!(view.save().await, Outcome::Applied);
    }

    assert_eq!(view.toggle_sort(), SortDirection::Descending);
    let titles: Vec<String> = view.notes().into_iter().map(|note| note.title).collect();
    assert_eq!(titles, vec!["Work", "Groceries"]);

    let groceries = view.notes()[1].id.clone();
    assert_eq!(view.delete(Some(&groceries)).await, Outcome::Applied);

    // A fresh load sees exactly what the view kept.
    let remaining = view.api().fetch_notes().await.expect("list");
    assert_eq!(remaining, view.notes());
    assert_eq!(remaining.len(), 1);
    assert!(view.prompter().alerts.lock().unwrap().is_empty());
}
