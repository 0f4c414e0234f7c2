//! Drives `ApiClient` against an in-process actix-web stand-in for the portal.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use hrm_portal::api::leave_request::ADMIN_REQUIRED;
use hrm_portal::auth::session::Session;
use hrm_portal::error::{GENERIC_FAILURE, PortalError};
use hrm_portal::geo::Coordinates;
use hrm_portal::model::attendance::{DayStatus, Month};
use hrm_portal::model::leave_request::{LeaveFilter, LeaveId, LeaveStatus};
use hrm_portal::model::permission::PermissionForm;
use hrm_portal::ApiClient;

const TOKEN: &str = "abc123";

#[derive(Default)]
struct Seen {
    bodies: Mutex<Vec<(String, Value)>>,
    leave_type_hits: AtomicUsize,
    history_month: Mutex<Option<String>>,
}

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Token {TOKEN}"))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"detail": "Invalid token."}))
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    if body["employee_id"] == "E-17" && body["password"] == "s3cret" {
        HttpResponse::Ok().json(json!({
            "token": TOKEN,
            "user": {"id": 4, "employee_id": 17, "username": "asha", "email": "asha@example.com"}
        }))
    } else {
        HttpResponse::BadRequest().json(json!({"error": "Invalid credentials"}))
    }
}

async fn today(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    HttpResponse::Ok().json(json!({
        "employee": {"name": "Asha Rahman", "email": "asha@example.com", "employee_id": "E-17"},
        "attendance": {"date": "2024-06-03", "check_in": "09:58:00", "check_out": null, "status": "OnTime"}
    }))
}

async fn check_in(req: HttpRequest, body: web::Json<Value>, seen: web::Data<Seen>) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    seen.bodies
        .lock()
        .unwrap()
        .push(("checkin".into(), body.into_inner()));
    HttpResponse::Ok().json(json!({"message": "Checked in successfully"}))
}

async fn check_out() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"error": "You have not checked in today"}))
}

async fn history(
    query: web::Query<HashMap<String, String>>,
    seen: web::Data<Seen>,
) -> HttpResponse {
    *seen.history_month.lock().unwrap() = query.get("month").cloned();
    HttpResponse::Ok().json(json!([
        {"date": "2024-06-03", "check_in": "09:58", "check_out": "18:01", "status": "Present", "remarks": ""},
        {"date": "2024-06-04", "check_in": "10:31", "check_out": "18:20", "status": "Late"},
        {"date": "2024-06-05", "check_in": null, "check_out": null, "status": "Absent"}
    ]))
}

async fn leave_types(seen: web::Data<Seen>) -> HttpResponse {
    seen.leave_type_hits.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(json!([
        {"id": 1, "name": "Sick Leave"},
        {"id": 2, "name": "Casual Leave"},
        {"id": 3, "name": "Maternity Leave"}
    ]))
}

async fn leave_balance() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {"leave_type": "Sick Leave", "total_allowed": 10, "used": 2, "pending": 1, "available": 7},
        {"leave_type": "Earned Leave", "total_allowed": 15, "used": 0, "pending": 0, "available": 15}
    ]))
}

async fn my_requests() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {"id": 1, "leave_type_name": "Sick Leave", "start_date": "2024-06-10", "end_date": "2024-06-10",
         "total_days": 1, "reason": "Fever", "status": "Approved", "approved_by_name": "Manager"},
        {"id": 2, "leave_type_name": "Casual Leave", "start_date": "2024-07-01", "end_date": "2024-07-02",
         "total_days": 2, "reason": "Family event", "status": "Pending"},
        {"id": 3, "leave_type_name": "Maternity Leave", "start_date": "2024-08-01", "end_date": "2024-10-31",
         "reason": "", "status": "Pending"}
    ]))
}

async fn pending() -> HttpResponse {
    HttpResponse::Forbidden().json(json!({"detail": "You do not have permission to perform this action."}))
}

async fn reject(path: web::Path<u64>, body: web::Json<Value>, seen: web::Data<Seen>) -> HttpResponse {
    seen.bodies
        .lock()
        .unwrap()
        .push((format!("reject/{}", path.into_inner()), body.into_inner()));
    HttpResponse::Ok().json(json!({"message": "Leave rejected"}))
}

async fn permission_create(body: web::Json<Value>, seen: web::Data<Seen>) -> HttpResponse {
    seen.bodies
        .lock()
        .unwrap()
        .push(("permission".into(), body.into_inner()));
    HttpResponse::Created().json(json!({"id": 12}))
}

async fn broken_me() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body("<html>maintenance</html>")
}

/// Starts the stand-in on an ephemeral port and returns its base URL.
fn serve(seen: web::Data<Seen>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(seen.clone())
            .route("/api/accounts/login/", web::post().to(login))
            .route("/api/employee/me/", web::get().to(broken_me))
            .route("/api/attendance/today/", web::get().to(today))
            .route("/api/attendance/checkin/", web::post().to(check_in))
            .route("/api/attendance/checkout/", web::post().to(check_out))
            .route("/api/attendance/history/", web::get().to(history))
            .route("/api/permission/create/", web::post().to(permission_create))
            .route("/api/leave/types/", web::get().to(leave_types))
            .route("/api/leave/balance/", web::get().to(leave_balance))
            .route("/api/leave/my-requests/", web::get().to(my_requests))
            .route("/api/leave/pending/", web::get().to(pending))
            .route("/api/leave/{id}/reject/", web::post().to(reject))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}/")
}

fn session() -> Session {
    Session::new(TOKEN, None)
}

#[actix_web::test]
async fn login_returns_a_session_for_valid_credentials() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let session = client.login(" E-17 ", "s3cret").await.unwrap();

    assert_eq!(session.authorization(), "Token abc123");
    let user = session.user.unwrap();
    assert_eq!(user.employee_id.as_deref(), Some("17"));
    assert_eq!(user.name.as_deref(), Some("asha"));
}

#[actix_web::test]
async fn login_rejection_and_missing_fields() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let err = client.login("E-17", "wrong").await.unwrap_err();
    assert_eq!(
        err.user_message("Invalid Employee ID or Password"),
        "Invalid credentials"
    );

    let err = client.login("  ", "s3cret").await.unwrap_err();
    assert!(matches!(err, PortalError::Validation(_)));
}

#[actix_web::test]
async fn today_is_fetched_with_token_header() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let today = client.attendance_today(&session()).await.unwrap();
    let record = today.attendance.unwrap();
    assert_eq!(record.status, Some(DayStatus::OnTime));
    assert!(record.is_checked_in());
    assert_eq!(today.employee.unwrap().employee_id.as_deref(), Some("E-17"));

    let err = client
        .attendance_today(&Session::new("stale", None))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Unable to fetch attendance"), "Invalid token.");
}

#[actix_web::test]
async fn check_in_posts_coordinates() {
    let seen = web::Data::new(Seen::default());
    let client = ApiClient::new(serve(seen.clone())).unwrap();
    let at = Coordinates::new(23.8103, 90.4125).unwrap();

    client.check_in(&session(), at).await.unwrap();

    let bodies = seen.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].0, "checkin");
    assert_eq!(bodies[0].1, json!({"latitude": 23.8103, "longitude": 90.4125}));
}

#[actix_web::test]
async fn check_out_rejection_carries_server_error() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();
    let at = Coordinates::new(23.8103, 90.4125).unwrap();

    let err = client.check_out(&session(), at).await.unwrap_err();

    assert!(matches!(err, PortalError::ServerRejected { status: 400, .. }));
    assert_eq!(err.user_message("Action failed"), "You have not checked in today");
}

#[actix_web::test]
async fn history_sends_month_and_parses_rows() {
    let seen = web::Data::new(Seen::default());
    let client = ApiClient::new(serve(seen.clone())).unwrap();
    let month: Month = "2024-06".parse().unwrap();

    let rows = client.attendance_history(&session(), month).await.unwrap();

    assert_eq!(seen.history_month.lock().unwrap().as_deref(), Some("2024-06"));
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].status, Some(DayStatus::OnTime));
    assert_eq!(rows[2].check_in, None);
}

#[actix_web::test]
async fn leave_types_are_filtered_and_cached() {
    let seen = web::Data::new(Seen::default());
    let client = ApiClient::new(serve(seen.clone())).unwrap();

    let first = client.leave_types(&session()).await.unwrap();
    let second = client.leave_types(&session()).await.unwrap();

    let names: Vec<_> = first.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Sick Leave", "Casual Leave"]);
    assert_eq!(first, second);
    assert_eq!(seen.leave_type_hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn overview_hides_unknown_balances() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let overview = client.leave_overview(&session()).await.unwrap();

    assert_eq!(overview.types.len(), 2);
    assert_eq!(overview.balance.len(), 1);
    assert_eq!(overview.balance[0].available, 7.0);
}

#[actix_web::test]
async fn my_leaves_apply_status_filter() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let all = client.my_leaves(&session(), LeaveFilter::All).await.unwrap();
    let pending = client
        .my_leaves(&session(), LeaveFilter::Pending)
        .await
        .unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, LeaveId(2));
    assert_eq!(pending[0].status, LeaveStatus::Pending);
}

#[actix_web::test]
async fn pending_queue_requires_admin() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let err = client.pending_leaves(&session()).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message("unused"), ADMIN_REQUIRED);
}

#[actix_web::test]
async fn reject_needs_a_reason() {
    let seen = web::Data::new(Seen::default());
    let client = ApiClient::new(serve(seen.clone())).unwrap();

    let err = client
        .reject_leave(&session(), LeaveId(5), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation(_)));
    assert!(seen.bodies.lock().unwrap().is_empty());

    client
        .reject_leave(&session(), LeaveId(5), " Quarter close ")
        .await
        .unwrap();
    let bodies = seen.bodies.lock().unwrap();
    assert_eq!(bodies[0].0, "reject/5");
    assert_eq!(bodies[0].1, json!({"rejection_reason": "Quarter close"}));
}

#[actix_web::test]
async fn permission_times_are_normalized() {
    let seen = web::Data::new(Seen::default());
    let client = ApiClient::new(serve(seen.clone())).unwrap();
    let form = PermissionForm {
        start_time: "9:05".into(),
        end_time: "13:30:00".into(),
        reason: "Bank visit".into(),
    };

    client.create_permission(&session(), form).await.unwrap();

    let bodies = seen.bodies.lock().unwrap();
    assert_eq!(
        bodies[0].1,
        json!({"start_time": "09:05", "end_time": "13:30", "reason": "Bank visit"})
    );
}

#[actix_web::test]
async fn non_json_success_is_malformed() {
    let client = ApiClient::new(serve(web::Data::new(Seen::default()))).unwrap();

    let err = client.me(&session()).await.unwrap_err();

    assert!(matches!(err, PortalError::MalformedResponse(_)));
    assert_eq!(err.user_message("ignored"), GENERIC_FAILURE);
}

#[actix_web::test]
async fn unreachable_server_is_a_network_failure() {
    // nothing listens on the discard port
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();

    let err = client.attendance_today(&session()).await.unwrap_err();

    assert!(matches!(err, PortalError::NetworkFailure(_)));
    assert_eq!(err.user_message("Unable to fetch attendance"), GENERIC_FAILURE);
}
