#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    App,
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use fake::Fake;
use fake::faker::job::en::Title;
use fake::faker::name::en::{FirstName, LastName};
use serde_json::{Value, json};
use std::env;
use uuid::Uuid;

use hrms::middleware::RequestId;
use hrms::{AuthService, Config, init_store, routes};

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const PASSWORD: &str = "password123";

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Full API over a fresh store seeded with the bootstrap admin.
pub async fn test_app()
-> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let config = Config::test_config();
    let auth_service = AuthService::new(config.clone());
    let admin_hash = auth_service
        .hash_password(&config.bootstrap_admin_password)
        .expect("hash admin password");
    let store = init_store(&config, admin_hash);

    test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(auth_service))
            .app_data(web::Data::new(config))
            .wrap(RequestId)
            .configure(routes::configure),
    )
    .await
}

/// Sends the request and returns the status with the body parsed as JSON
/// (`Null` when the body is not JSON).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get<S, B>(app: &S, token: &str, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    send(app, req).await
}

pub async fn post<S, B>(app: &S, token: &str, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(&body)
        .to_request();
    send(app, req).await
}

pub async fn put<S, B>(app: &S, token: &str, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::put()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(&body)
        .to_request();
    send(app, req).await
}

pub async fn delete<S, B>(app: &S, token: &str, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::delete()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    send(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);

    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

pub async fn admin_token<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Shape of an employee to hire through the API. Names and designation are
/// generated.
#[derive(Debug, Clone)]
pub struct Hire {
    pub role: &'static str,
    pub employment_type: &'static str,
    pub department: &'static str,
    pub reporting_manager_id: Option<String>,
    pub functional_manager_id: Option<String>,
}

impl Default for Hire {
    fn default() -> Self {
        Self {
            role: "employee",
            employment_type: "permanent",
            department: "Engineering",
            reporting_manager_id: None,
            functional_manager_id: None,
        }
    }
}

impl Hire {
    pub fn manager() -> Self {
        Self {
            role: "manager",
            ..Self::default()
        }
    }

    pub fn reporting_to(manager: &Member) -> Self {
        Self {
            reporting_manager_id: Some(manager.id.clone()),
            ..Self::default()
        }
    }

    pub fn functional(mut self, manager: &Member) -> Self {
        self.functional_manager_id = Some(manager.id.clone());
        self
    }

    pub fn employment(mut self, employment_type: &'static str) -> Self {
        self.employment_type = employment_type;
        self
    }

    pub fn to_json(&self, email: &str) -> Value {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let designation: String = Title().fake();

        json!({
            "firstName": first_name,
            "lastName": last_name,
            "email": email,
            "password": PASSWORD,
            "role": self.role,
            "department": self.department,
            "designation": designation,
            "reportingManagerId": self.reporting_manager_id,
            "functionalManagerId": self.functional_manager_id,
            "employmentType": self.employment_type,
            "ctc": "600000",
            "dateOfJoining": "2024-01-01"
        })
    }
}

/// A hired employee with a live session.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn unique_email() -> String {
    format!("{}@test.local", Uuid::new_v4().simple())
}

/// Hires through `POST /employees` as `hr_token`, then logs the new
/// employee in.
pub async fn hire<S, B>(app: &S, hr_token: &str, hire: Hire) -> Member
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = unique_email();
    let (status, body) = post(app, hr_token, "/api/v1/employees", hire.to_json(&email)).await;
    assert_eq!(status, StatusCode::CREATED, "hire failed: {}", body);

    let id = body["data"]["id"]
        .as_str()
        .expect("employee id")
        .to_string();
    let token = login(app, &email, PASSWORD).await;

    Member { id, email, token }
}
