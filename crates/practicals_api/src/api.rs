//! Request handlers for the record store transport boundary.
//!
//! # Responsibility
//! - Accept JSON payloads, run one use case against an [`AppContext`],
//!   and answer with a status envelope.
//! - Keep error semantics flat: one status per error family.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an [`ApiResponse`].
//! - Response bodies are serde JSON values with stable field names.
//! - Routing and HTTP framing belong to the caller.

use log::warn;
use practicals_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppContext, FieldValue, RecordId, RecordService, ReminderStatus, RepoError, Repository,
    TableMapping, Task,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outcome family of one handler call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Ok,
    Created,
    NotFound,
    ValidationError,
    Conflict,
    BusinessRule,
    Error,
}

impl ApiStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created)
    }
}

/// Response envelope returned by every handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    /// Record, list or summary payload; absent on failures and deletes.
    pub body: Option<Value>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ApiResponse {
    fn success(status: ApiStatus, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status,
            body,
            message: message.into(),
        }
    }

    fn failure(status: ApiStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            message: message.into(),
        }
    }

    fn from_error(operation: &str, err: &RepoError) -> Self {
        let status = status_for(err);
        warn!(
            "event=api_request module=api status=error op={} code={} error={}",
            operation,
            err.code(),
            err
        );
        Self::failure(status, format!("{operation} failed: {err}"))
    }
}

/// Maps a core error onto its transport status.
pub fn status_for(err: &RepoError) -> ApiStatus {
    match err {
        RepoError::Validation(_) => ApiStatus::ValidationError,
        RepoError::NotFound { .. } => ApiStatus::NotFound,
        RepoError::Conflict(_) => ApiStatus::Conflict,
        RepoError::BusinessRule(_) => ApiStatus::BusinessRule,
        RepoError::IllegalState(_)
        | RepoError::Db(_)
        | RepoError::InvalidData(_)
        | RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => ApiStatus::Error,
    }
}

/// Health-check probe.
pub fn ping() -> String {
    ping_inner().to_owned()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the same `level + log_dir` is a no-op.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(_) => String::new(),
        Err(err) => err,
    }
}

/// Stores a new record decoded from `payload`.
pub fn create_record<T>(ctx: &AppContext, payload: &str) -> ApiResponse
where
    T: TableMapping + Serialize + DeserializeOwned,
{
    let operation = format!("create_{}", T::KIND);
    let record = match decode::<T>(&operation, payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    let created = ctx
        .coordinator()
        .run(|unit| unit.repository::<T>()?.create(&record));
    match created {
        Ok(record) => respond_with(
            &operation,
            ApiStatus::Created,
            &record,
            format!("{} created.", T::KIND),
        ),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Reads one record by id.
pub fn get_record<T>(ctx: &AppContext, id: RecordId) -> ApiResponse
where
    T: TableMapping + Serialize,
{
    let operation = format!("get_{}", T::KIND);
    match ctx.records::<T>().and_then(|service| service.get_by_id(id)) {
        Ok(Some(record)) => respond_with(
            &operation,
            ApiStatus::Ok,
            &record,
            format!("{} found.", T::KIND),
        ),
        Ok(None) => {
            ApiResponse::failure(ApiStatus::NotFound, format!("{} not found: {id}", T::KIND))
        }
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Replaces the record stored under `id` with the decoded payload. An id
/// inside the payload is ignored.
pub fn update_record<T>(ctx: &AppContext, id: RecordId, payload: &str) -> ApiResponse
where
    T: TableMapping + Serialize + DeserializeOwned,
{
    let operation = format!("update_{}", T::KIND);
    let record = match decode::<T>(&operation, payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    let updated = ctx
        .coordinator()
        .run(|unit| RecordService::new(unit.repository::<T>()?).replace(id, &record));
    match updated {
        Ok(record) => respond_with(
            &operation,
            ApiStatus::Ok,
            &record,
            format!("{} updated.", T::KIND),
        ),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

pub fn delete_record<T>(ctx: &AppContext, id: RecordId) -> ApiResponse
where
    T: TableMapping,
{
    let operation = format!("delete_{}", T::KIND);
    let deleted = ctx
        .coordinator()
        .run(|unit| unit.repository::<T>()?.delete(id));
    match deleted {
        Ok(()) => ApiResponse::success(ApiStatus::Ok, None, format!("{} deleted.", T::KIND)),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Lists every stored record in insertion order.
pub fn list_records<T>(ctx: &AppContext) -> ApiResponse
where
    T: TableMapping + Serialize,
{
    let operation = format!("list_{}", T::KIND);
    match ctx.records::<T>().and_then(|service| service.get_all()) {
        Ok(records) => list_response(&operation, &records),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Lists records whose `field` equals the JSON scalar `value`.
pub fn find_records<T>(ctx: &AppContext, field: &str, value: &str) -> ApiResponse
where
    T: TableMapping + Serialize,
{
    let operation = format!("find_{}", T::KIND);
    let value = match decode::<FieldValue>(&operation, value) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match ctx
        .records::<T>()
        .and_then(|service| service.find_all(field, &value))
    {
        Ok(records) => list_response(&operation, &records),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Lists records whose numeric `field` lies in `[low, high]`.
pub fn range_records<T>(ctx: &AppContext, field: &str, low: f64, high: f64) -> ApiResponse
where
    T: TableMapping + Serialize,
{
    let operation = format!("range_{}", T::KIND);
    match ctx
        .records::<T>()
        .and_then(|service| service.find_in_range(field, low, high))
    {
        Ok(records) => list_response(&operation, &records),
        Err(err) => ApiResponse::from_error(&operation, &err),
    }
}

/// Commits a task, then sends the assignee reminder.
///
/// A failed reminder keeps the `created` status; the body reports
/// `"reminder": "failed"` and the message carries the notifier error.
pub fn create_task(ctx: &AppContext, payload: &str) -> ApiResponse {
    let operation = "create_task";
    let task = match decode::<Task>(operation, payload) {
        Ok(task) => task,
        Err(response) => return response,
    };
    let created = match ctx.tasks().create_task(&task) {
        Ok(created) => created,
        Err(err) => return ApiResponse::from_error(operation, &err),
    };
    let (reminder, message) = match &created.reminder {
        ReminderStatus::Sent => ("sent", "task created; reminder sent.".to_string()),
        ReminderStatus::Skipped => ("skipped", "task created.".to_string()),
        ReminderStatus::Failed(err) => ("failed", format!("task created; reminder failed: {err}")),
    };
    match serde_json::to_value(&created.task) {
        Ok(task) => ApiResponse::success(
            ApiStatus::Created,
            Some(json!({ "task": task, "reminder": reminder })),
            message,
        ),
        Err(err) => encode_failure(operation, &err),
    }
}

fn decode<D: DeserializeOwned>(operation: &str, payload: &str) -> Result<D, ApiResponse> {
    serde_json::from_str(payload).map_err(|err| {
        warn!(
            "event=api_request module=api status=error op={} code=malformed_payload error={}",
            operation, err
        );
        ApiResponse::failure(
            ApiStatus::ValidationError,
            format!("{operation} failed: malformed payload: {err}"),
        )
    })
}

fn respond_with<S: Serialize>(
    operation: &str,
    status: ApiStatus,
    record: &S,
    message: String,
) -> ApiResponse {
    match serde_json::to_value(record) {
        Ok(body) => ApiResponse::success(status, Some(body), message),
        Err(err) => encode_failure(operation, &err),
    }
}

fn list_response<S: Serialize>(operation: &str, records: &[S]) -> ApiResponse {
    let message = if records.is_empty() {
        "No results.".to_string()
    } else {
        format!("Found {} result(s).", records.len())
    };
    respond_with(operation, ApiStatus::Ok, &records, message)
}

fn encode_failure(operation: &str, err: &serde_json::Error) -> ApiResponse {
    warn!(
        "event=api_request module=api status=error op={} code=encode_failed error={}",
        operation, err
    );
    ApiResponse::failure(ApiStatus::Error, format!("{operation} failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, create_record, delete_record, find_records, get_record, init_logging,
        list_records, ping, range_records, status_for, update_record, ApiStatus,
    };
    use practicals_core::{AppConfig, AppContext, Book, Employee, RepoError, User};
    use serde_json::json;

    fn context() -> AppContext {
        AppContext::open(AppConfig::default()).expect("open in-memory context")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn status_mapping_follows_error_family() {
        assert_eq!(
            status_for(&RepoError::NotFound { kind: "book", id: 3 }),
            ApiStatus::NotFound
        );
        assert_eq!(
            status_for(&RepoError::Conflict("locked".to_string())),
            ApiStatus::Conflict
        );
        assert_eq!(
            status_for(&RepoError::business_rule("cap")),
            ApiStatus::BusinessRule
        );
        assert_eq!(
            status_for(&RepoError::IllegalState("nested")),
            ApiStatus::Error
        );
    }

    #[test]
    fn only_ok_and_created_count_as_success() {
        assert!(ApiStatus::Ok.is_success());
        assert!(ApiStatus::Created.is_success());
        assert!(!ApiStatus::NotFound.is_success());
        assert!(!ApiStatus::Conflict.is_success());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let value = serde_json::to_value(ApiStatus::ValidationError).expect("serialize");
        assert_eq!(value, json!("validation_error"));
    }

    #[test]
    fn create_then_get_returns_stored_record() {
        let ctx = context();
        let payload = json!({
            "title": "Spring in Action",
            "author": "Craig Walls",
            "isbn": "9781617294945",
            "price": 39.99
        });
        let created = create_record::<Book>(&ctx, &payload.to_string());
        assert_eq!(created.status, ApiStatus::Created, "{}", created.message);
        let body = created.body.expect("created body");
        let id = body["id"].as_i64().expect("assigned id");

        let fetched = get_record::<Book>(&ctx, id);
        assert_eq!(fetched.status, ApiStatus::Ok);
        assert_eq!(fetched.body, Some(body));
    }

    #[test]
    fn malformed_payload_is_validation_error() {
        let ctx = context();
        let response = create_record::<Book>(&ctx, "{not json");
        assert_eq!(response.status, ApiStatus::ValidationError);
        assert!(response.message.contains("malformed payload"));
        assert!(response.body.is_none());
    }

    #[test]
    fn invalid_record_is_validation_error() {
        let ctx = context();
        let payload = json!({
            "username": "ana",
            "email": "not-an-address",
            "display_name": "Ana"
        });
        let response = create_record::<User>(&ctx, &payload.to_string());
        assert_eq!(response.status, ApiStatus::ValidationError);
        assert_eq!(list_records::<User>(&ctx).body, Some(json!([])));
    }

    #[test]
    fn absent_ids_are_not_found() {
        let ctx = context();
        let payload = json!({
            "first_name": "John",
            "last_name": "Doe",
            "department": "IT",
            "salary": 1000.0
        });
        assert_eq!(get_record::<Employee>(&ctx, 42).status, ApiStatus::NotFound);
        assert_eq!(
            update_record::<Employee>(&ctx, 42, &payload.to_string()).status,
            ApiStatus::NotFound
        );
        assert_eq!(delete_record::<Employee>(&ctx, 42).status, ApiStatus::NotFound);
    }

    #[test]
    fn find_and_range_filter_listed_records() {
        let ctx = context();
        for (title, author, price) in [
            ("Spring in Action", "Craig Walls", 39.99),
            ("Spring Boot in Action", "Craig Walls", 45.0),
            ("Java Basics", "Someone Else", 29.99),
        ] {
            let payload = json!({ "title": title, "author": author, "isbn": "", "price": price });
            let response = create_record::<Book>(&ctx, &payload.to_string());
            assert_eq!(response.status, ApiStatus::Created, "{}", response.message);
        }

        let by_author = find_records::<Book>(&ctx, "author", "\"Craig Walls\"");
        assert_eq!(by_author.status, ApiStatus::Ok);
        assert_eq!(by_author.body.expect("body").as_array().map(Vec::len), Some(2));

        let in_range = range_records::<Book>(&ctx, "price", 30.0, 40.0);
        let titles: Vec<String> = in_range
            .body
            .expect("body")
            .as_array()
            .expect("array")
            .iter()
            .map(|book| book["title"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(titles, vec!["Spring in Action".to_string()]);

        let unknown = find_records::<Book>(&ctx, "publisher", "\"x\"");
        assert_eq!(unknown.status, ApiStatus::ValidationError);
        let inverted = range_records::<Book>(&ctx, "price", 50.0, 10.0);
        assert_eq!(inverted.status, ApiStatus::ValidationError);
    }
}
