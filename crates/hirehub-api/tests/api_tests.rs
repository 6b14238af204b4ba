//! End-to-end router tests against a mocked Firestore emulator.

use argon2::Params;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use hirehub_api::{create_router, ApiConfig, AppState, PasswordHasher, TokenService};
use hirehub_firestore::types::Document;
use hirehub_firestore::{email_key, FirestoreClient, FirestoreConfig, Record};
use hirehub_models::{
    AccountId, AccountKind, Applicants, JobId, JobPosting, JobSeekerAccount, RecruiterAccount,
    WorkMode, WorkStatus,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-secret-test-secret-test-secret";
const DOCS: &str = "/v1/projects/demo/databases/(default)/documents";
const UPDATE_TIME: &str = "2024-05-01T10:00:00.000001Z";

fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap())
}

async fn app_with(server: &MockServer, config: ApiConfig) -> Router {
    let firestore =
        FirestoreClient::new(FirestoreConfig::emulator("demo", server.address().to_string()))
            .await
            .unwrap();
    let state = AppState::with_firestore(config, firestore).with_password_hasher(fast_hasher());
    create_router(state, None)
}

async fn app(server: &MockServer) -> Router {
    app_with(server, ApiConfig::with_secret(SECRET)).await
}

fn token(id: &str, kind: AccountKind) -> String {
    TokenService::new(SECRET.as_bytes(), Duration::days(30))
        .issue(&AccountId::from(id), kind)
        .unwrap()
}

fn stored<R: Record>(record: &R) -> Value {
    let mut doc = serde_json::to_value(Document::new(record.to_fields())).unwrap();
    doc["name"] = json!(format!(
        "projects/demo/databases/(default)/documents/{}/{}",
        R::COLLECTION,
        record.record_id()
    ));
    doc["updateTime"] = json!(UPDATE_TIME);
    doc
}

fn recruiter(id: &str) -> RecruiterAccount {
    RecruiterAccount {
        id: AccountId::from(id),
        email: format!("{}@corp.example", id),
        password_hash: "unused".into(),
        full_name: "Rita Recruiter".into(),
        mobile: "9000000000".into(),
        company_name: "Corp".into(),
        designation: "HR".into(),
        is_verified: false,
        created_at: Utc::now(),
    }
}

fn seeker(id: &str, password_hash: &str) -> JobSeekerAccount {
    JobSeekerAccount {
        id: AccountId::from(id),
        email: format!("{}@mail.example", id),
        password_hash: password_hash.into(),
        full_name: "Sam Seeker".into(),
        mobile: "9111111111".into(),
        work_status: WorkStatus::Fresher,
        receive_updates: false,
        created_at: Utc::now(),
    }
}

fn job(id: &str, owner: &str, experience: &str, work_mode: WorkMode) -> JobPosting {
    JobPosting {
        id: JobId::from(id),
        title: "Backend Engineer".into(),
        company: "Acme".into(),
        experience: experience.into(),
        salary: "10-15 Lacs PA".into(),
        location: "Pune".into(),
        skills: vec!["Rust".into()],
        posted_date: "Today".into(),
        work_mode,
        department: "Engineering".into(),
        recruiter_id: AccountId::from(owner),
        applicants: Applicants::new(),
        created_at: Utc::now(),
    }
}

async fn mount_get(server: &MockServer, collection: &str, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/{collection}/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn registration(work_status: &str) -> Value {
    json!({
        "fullName": "Sam Seeker",
        "email": "sam@mail.example",
        "password": "correct horse",
        "mobile": "9111111111",
        "workStatus": work_status
    })
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_rejects_unknown_work_status_without_store_calls() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, body) = send(&app, json_request("POST", "/api/auth/register", None, registration("manager"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid work status");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/recruiter/register", None, json!({ "email": "r@corp.example" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All required fields must be provided");
}

#[tokio::test]
async fn test_register_returns_token_and_public_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:commit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "writeResults": [{}, {}] })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server).await;

    let (status, body) = send(&app, json_request("POST", "/api/auth/register", None, registration("fresher"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["fullName"], "Sam Seeker");
    assert_eq!(body["user"]["workStatus"], "fresher");
    assert!(body["user"].get("passwordHash").is_none());

    let claims = TokenService::new(SECRET.as_bytes(), Duration::days(30))
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.kind, AccountKind::JobSeeker);
    assert_eq!(claims.sub, body["user"]["id"].as_str().unwrap());

    // Account and email index are written together, and no plaintext is stored
    let requests = server.received_requests().await.unwrap();
    let commit: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(commit["writes"].as_array().unwrap().len(), 2);
    assert!(!String::from_utf8_lossy(&requests[0].body).contains("correct horse"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:commit")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "code": 409, "status": "ALREADY_EXISTS" }
        })))
        .mount(&server)
        .await;
    let app = app(&server).await;

    let (status, body) = send(&app, json_request("POST", "/api/auth/register", None, registration("fresher"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_login_does_not_reveal_which_credential_was_wrong() {
    let server = MockServer::start().await;
    let hash = fast_hasher().hash("right-password".into()).await.unwrap();
    let account = seeker("seeker-1", &hash);

    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/job_seeker_emails/{}", email_key(&account.email))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/job_seeker_emails/x",
            "fields": {
                "account_id": { "stringValue": "seeker-1" },
                "email": { "stringValue": account.email.clone() }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/job_seeker_emails/{}", email_key("nobody@mail.example"))))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_get(&server, "job_seekers", "seeker-1", stored(&account)).await;
    let app = app(&server).await;

    let (wrong_status, wrong_body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": account.email.clone(), "password": "wrong-password" }),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@mail.example", "password": "whatever" }),
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid email or password");

    let (ok_status, ok_body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": account.email.clone(), "password": "right-password" }),
        ),
    )
    .await;
    assert_eq!(ok_status, StatusCode::OK);
    assert_eq!(ok_body["user"]["id"], "seeker-1");
}

// ============================================================================
// Auth domains
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, body) = send(&app, json_request("POST", "/api/jobs", None, json!({}))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "No token, authorization denied");
}

#[tokio::test]
async fn test_tokens_do_not_cross_account_kinds() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let seeker_token = token("seeker-1", AccountKind::JobSeeker);
    let (status, _) = send(&app, get_request("/api/recruiter/profile", Some(&seeker_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let recruiter_token = token("rec-1", AccountKind::Recruiter);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/jobs/job-1/apply", Some(&recruiter_token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Rejected before any account lookup
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_for_deleted_account_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/recruiters/rec-gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        get_request("/api/recruiter/profile", Some(&token("rec-gone", AccountKind::Recruiter))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn test_recruiter_profile_hides_password_hash() {
    let server = MockServer::start().await;
    mount_get(&server, "recruiters", "rec-1", stored(&recruiter("rec-1"))).await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        get_request("/api/recruiter/profile", Some(&token("rec-1", AccountKind::Recruiter))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], "rec-1");
    assert_eq!(body["isVerified"], false);
    assert!(body.get("passwordHash").is_none());
}

// ============================================================================
// Jobs
// ============================================================================

#[tokio::test]
async fn test_bulk_create_stamps_caller_as_owner() {
    let server = MockServer::start().await;
    mount_get(&server, "recruiters", "rec-1", stored(&recruiter("rec-1"))).await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:commit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "writeResults": [{}, {}, {}] })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server).await;

    let new_job = |title: &str| {
        json!({
            "title": title,
            "company": "Acme",
            "experience": "2-5 Yrs",
            "salary": "10-15 Lacs PA",
            "location": "Pune",
            "skills": ["Rust"],
            "postedDate": "Today",
            "workMode": "Remote",
            "department": "Engineering",
            "recruiterId": "someone-else"
        })
    };
    let body = json!([new_job("A"), new_job("B"), new_job("C")]);

    let (status, created) = send(
        &app,
        json_request("POST", "/api/jobs", Some(&token("rec-1", AccountKind::Recruiter)), body),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created = created.as_array().unwrap();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|j| j["recruiterId"] == "rec-1"));

    let requests = server.received_requests().await.unwrap();
    let commit = requests
        .iter()
        .find(|r| r.url.path().ends_with(":commit"))
        .unwrap();
    let commit: Value = serde_json::from_slice(&commit.body).unwrap();
    let writes = commit["writes"].as_array().unwrap();
    assert_eq!(writes.len(), 3);
    for write in writes {
        assert_eq!(write["update"]["fields"]["recruiter_id"]["stringValue"], "rec-1");
    }
}

#[tokio::test]
async fn test_bulk_create_validates_every_item_before_writing() {
    let server = MockServer::start().await;
    mount_get(&server, "recruiters", "rec-1", stored(&recruiter("rec-1"))).await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:commit")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server).await;

    let body = json!([
        { "title": "A", "company": "Acme", "experience": "1 Yrs", "salary": "x",
          "location": "Pune", "postedDate": "Today", "workMode": "Remote", "department": "Eng" },
        { "title": "", "company": "Acme", "experience": "1 Yrs", "salary": "x",
          "location": "Pune", "postedDate": "Today", "workMode": "Remote", "department": "Eng" }
    ]);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/jobs", Some(&token("rec-1", AccountKind::Recruiter)), body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn mount_job_listing(server: &MockServer, jobs: &[JobPosting]) {
    let rows: Vec<Value> = jobs
        .iter()
        .map(|j| json!({ "document": stored(j), "readTime": UPDATE_TIME }))
        .collect();
    Mock::given(method("POST"))
        .and(path(format!("{DOCS}:runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(rows)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_by_experience_range() {
    let server = MockServer::start().await;
    mount_job_listing(
        &server,
        &[
            job("j1", "rec-1", "2-5 Yrs", WorkMode::Office),
            job("j2", "rec-1", "0-5 Yrs", WorkMode::Remote),
            job("j3", "rec-1", "6-9 Yrs", WorkMode::Hybrid),
            job("j4", "rec-1", "15+ Yrs", WorkMode::Remote),
        ],
    )
    .await;
    let app = app(&server).await;

    let (status, body) = send(&app, get_request("/api/jobs?experience=0-5", None)).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["j1", "j2"]);
}

#[tokio::test]
async fn test_search_by_work_mode_list() {
    let server = MockServer::start().await;
    mount_job_listing(
        &server,
        &[
            job("j1", "rec-1", "2-5 Yrs", WorkMode::Office),
            job("j2", "rec-1", "0-5 Yrs", WorkMode::Remote),
            job("j3", "rec-1", "6-9 Yrs", WorkMode::Hybrid),
        ],
    )
    .await;
    let app = app(&server).await;

    let (status, body) = send(&app, get_request("/api/jobs?workMode=Remote,Hybrid", None)).await;

    assert_eq!(status, StatusCode::OK);
    let modes: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["workMode"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(modes, vec!["Remote", "Hybrid"]);
}

#[tokio::test]
async fn test_apply_twice_admits_one_applicant() {
    let server = MockServer::start().await;
    mount_get(&server, "job_seekers", "seeker-1", stored(&seeker("seeker-1", "unused"))).await;

    let fresh = job("job-1", "rec-1", "2-5 Yrs", WorkMode::Remote);
    let mut applied = fresh.clone();
    applied.applicants.admit(AccountId::from("seeker-1")).unwrap();

    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/jobs/job-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored(&fresh)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/jobs/job-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored(&applied)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{DOCS}/jobs/job-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored(&applied)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server).await;
    let seeker_token = token("seeker-1", AccountKind::JobSeeker);

    let (first, first_body) = send(
        &app,
        json_request("POST", "/api/jobs/job-1/apply", Some(&seeker_token), json!({})),
    )
    .await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(first_body["success"], true);
    assert_eq!(first_body["message"], "Successfully applied for the job");

    let (second, second_body) = send(
        &app,
        json_request("POST", "/api/jobs/job-1/apply", Some(&seeker_token), json!({})),
    )
    .await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(second_body["message"], "You have already applied for this job");
}

#[tokio::test]
async fn test_apply_to_missing_job_is_not_found() {
    let server = MockServer::start().await;
    mount_get(&server, "job_seekers", "seeker-1", stored(&seeker("seeker-1", "unused"))).await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCS}/jobs/nope")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/jobs/nope/apply",
            Some(&token("seeker-1", AccountKind::JobSeeker)),
            json!({}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Job not found");
}

#[tokio::test]
async fn test_only_owner_may_update_job() {
    let server = MockServer::start().await;
    mount_get(&server, "recruiters", "rec-2", stored(&recruiter("rec-2"))).await;
    mount_get(&server, "jobs", "job-1", stored(&job("job-1", "rec-1", "2-5 Yrs", WorkMode::Remote))).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/jobs/job-1",
            Some(&token("rec-2", AccountKind::Recruiter)),
            json!({ "salary": "20 Lacs PA" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_ownership_check_can_be_disabled() {
    let server = MockServer::start().await;
    let posting = job("job-1", "rec-1", "2-5 Yrs", WorkMode::Remote);
    mount_get(&server, "recruiters", "rec-2", stored(&recruiter("rec-2"))).await;
    mount_get(&server, "jobs", "job-1", stored(&posting)).await;
    Mock::given(method("PATCH"))
        .and(path(format!("{DOCS}/jobs/job-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored(&posting)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ApiConfig::with_secret(SECRET);
    config.enforce_job_ownership = false;
    let app = app_with(&server, config).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/jobs/job-1",
            Some(&token("rec-2", AccountKind::Recruiter)),
            json!({ "salary": "20 Lacs PA", "recruiterId": "rec-2" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salary"], "20 Lacs PA");
    assert_eq!(body["recruiterId"], "rec-1");
}

// ============================================================================
// Companies and misc
// ============================================================================

#[tokio::test]
async fn test_delete_missing_company_twice_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{DOCS}/companies/ghost")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "status": "NOT_FOUND" }
        })))
        .expect(2)
        .mount(&server)
        .await;
    let app = app(&server).await;

    for _ in 0..2 {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/companies/ghost")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Company not found");
    }
}

#[tokio::test]
async fn test_company_rating_out_of_range_is_rejected() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/companies",
            None,
            json!({
                "name": "Acme",
                "logo": "https://acme.example/logo.png",
                "rating": 7.5,
                "reviewCount": 10,
                "type": "Startup",
                "industry": "Software",
                "location": "Pune",
                "activeJobs": 3
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_trending_bulk_requires_array() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/trending-jobs/bulk", None, json!({ "title": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request body must be an array of jobs");
}

#[tokio::test]
async fn test_unknown_trending_category_is_bad_request() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let (status, _) = send(&app, get_request("/api/trending-jobs/category/space-jobs", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let server = MockServer::start().await;
    let app = app(&server).await;

    let response = app.clone().oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-request-id"));
}
