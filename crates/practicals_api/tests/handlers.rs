use practicals_api::api::{
    create_record, create_task, delete_record, get_record, list_records, update_record,
};
use practicals_api::ApiStatus;
use practicals_core::{
    AppConfig, AppContext, Employee, GuestbookEntry, Notification, Notifier, NotifyError, Task,
};
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;

struct RejectingNotifier;

impl Notifier for RejectingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected {
            recipient: notification.recipient.clone(),
            reason: "mailbox full".to_string(),
        })
    }
}

#[derive(Default)]
struct CountingNotifier {
    sent: Mutex<usize>,
}

impl Notifier for CountingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            *sent += 1;
        }
        Ok(())
    }
}

fn file_context(dir: &TempDir) -> AppContext {
    let config = AppConfig {
        db_path: Some(dir.path().join("handlers.sqlite3")),
        ..AppConfig::default()
    };
    AppContext::open(config).expect("open file context")
}

#[test]
fn guestbook_lifecycle_over_handlers() {
    let dir = TempDir::new().expect("temp dir");
    let ctx = file_context(&dir);

    let created = create_record::<GuestbookEntry>(
        &ctx,
        &json!({ "name": "Ana", "message": "Hello" }).to_string(),
    );
    assert_eq!(created.status, ApiStatus::Created, "{}", created.message);
    let id = created.body.as_ref().and_then(|body| body["id"].as_i64()).expect("id");

    let updated = update_record::<GuestbookEntry>(
        &ctx,
        id,
        &json!({ "name": "Ana", "message": "Hello again" }).to_string(),
    );
    assert_eq!(updated.status, ApiStatus::Ok, "{}", updated.message);
    assert_eq!(
        updated.body,
        Some(json!({ "id": id, "name": "Ana", "message": "Hello again" }))
    );

    assert_eq!(delete_record::<GuestbookEntry>(&ctx, id).status, ApiStatus::Ok);
    assert_eq!(delete_record::<GuestbookEntry>(&ctx, id).status, ApiStatus::NotFound);
    assert_eq!(get_record::<GuestbookEntry>(&ctx, id).status, ApiStatus::NotFound);
    assert_eq!(list_records::<GuestbookEntry>(&ctx).body, Some(json!([])));
}

#[test]
fn update_keeps_target_id_when_payload_names_another() {
    let ctx = AppContext::open(AppConfig::default()).expect("context");
    let payload = json!({
        "first_name": "John",
        "last_name": "Doe",
        "department": "IT",
        "salary": 1000.0
    });
    let created = create_record::<Employee>(&ctx, &payload.to_string());
    let id = created.body.as_ref().and_then(|body| body["id"].as_i64()).expect("id");

    let mut conflicting = payload.clone();
    conflicting["id"] = json!(id + 7);
    conflicting["salary"] = json!(1200.0);
    let response = update_record::<Employee>(&ctx, id, &conflicting.to_string());
    assert_eq!(response.status, ApiStatus::Ok, "{}", response.message);
    assert!(response.status.is_success());
    let body = response.body.expect("updated body");
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["salary"], json!(1200.0));

    let stored = get_record::<Employee>(&ctx, id);
    assert_eq!(stored.body, Some(body));
    assert_eq!(get_record::<Employee>(&ctx, id + 7).status, ApiStatus::NotFound);
}

#[test]
fn create_task_reports_sent_reminder() {
    let ctx = AppContext::open(AppConfig::default())
        .expect("context")
        .with_notifier(Box::new(CountingNotifier::default()));
    let payload = json!({
        "title": "Review pull request",
        "assignee_email": "ana@example.com"
    });

    let response = create_task(&ctx, &payload.to_string());
    assert_eq!(response.status, ApiStatus::Created, "{}", response.message);
    let body = response.body.expect("body");
    assert_eq!(body["reminder"], json!("sent"));
    assert_eq!(body["task"]["title"], json!("Review pull request"));
}

#[test]
fn create_task_keeps_commit_when_reminder_fails() {
    let ctx = AppContext::open(AppConfig::default())
        .expect("context")
        .with_notifier(Box::new(RejectingNotifier));
    let payload = json!({
        "title": "Ship release",
        "assignee_email": "ops@example.com"
    });

    let response = create_task(&ctx, &payload.to_string());
    assert_eq!(response.status, ApiStatus::Created);
    assert!(response.message.contains("mailbox full"), "{}", response.message);
    assert_eq!(response.body.expect("body")["reminder"], json!("failed"));

    let listed = list_records::<Task>(&ctx).body.expect("body");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[test]
fn create_task_without_assignee_skips_reminder() {
    let ctx = AppContext::open(AppConfig::default())
        .expect("context")
        .with_notifier(Box::new(RejectingNotifier));

    let response = create_task(&ctx, &json!({ "title": "Solo work" }).to_string());
    assert_eq!(response.status, ApiStatus::Created);
    assert_eq!(response.body.expect("body")["reminder"], json!("skipped"));
}

#[test]
fn create_task_rejects_missing_title() {
    let ctx = AppContext::open(AppConfig::default()).expect("context");
    let response = create_task(&ctx, &json!({ "title": "   " }).to_string());
    assert_eq!(response.status, ApiStatus::ValidationError);
    assert_eq!(list_records::<Task>(&ctx).body, Some(json!([])));
}
