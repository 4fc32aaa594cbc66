use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Form, Json, Router,
    extract::{FromRef, Path, State},
    http::{HeaderName, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use products_hr::EmployeeDraft;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{config::AppConfig, session::SessionStore, view::render_page};

const SESSION_COOKIE: &str = "roster_session";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions = SessionStore::new(config.seed_roster, config.session_idle);
        Self {
            sessions: Arc::new(sessions),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.config.cookie_key.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee roster listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/", get(index_handler))
        .route("/employees", post(add_employee_handler))
        .route("/employees/{id}/delete", post(delete_employee_handler))
        .route("/draft/clear", post(clear_draft_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

/// Reads the session id from the cookie, minting a new one when absent or unreadable.
fn resolve_session(state: &AppState, jar: PrivateCookieJar) -> (PrivateCookieJar, Uuid) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    if let Some(session_id) = existing {
        return (jar, session_id);
    }
    let session_id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), session_id)
}

#[instrument(name = "http.index", skip_all)]
async fn index_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> HttpResult<(PrivateCookieJar, Html<String>)> {
    let (jar, session_id) = resolve_session(&state, jar);
    let page = state
        .sessions
        .with_session(session_id, |view| {
            let notice = view.notice.take();
            render_page(&view.hr, notice.as_deref())
        })
        .await
        .map_err(HttpError::internal)?;
    Ok((jar, Html(page)))
}

#[instrument(name = "http.add_employee", skip_all)]
async fn add_employee_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(draft): Form<EmployeeDraft>,
) -> HttpResult<(PrivateCookieJar, Redirect)> {
    let (jar, session_id) = resolve_session(&state, jar);
    state
        .sessions
        .with_session(session_id, |view| {
            view.hr.replace_draft(draft);
            if let Err(err) = view.hr.submit() {
                info!(%session_id, reason = %err, "rejected employee without name");
                view.notice = Some(err.to_string());
            }
        })
        .await;
    Ok((jar, Redirect::to("/")))
}

#[instrument(name = "http.delete_employee", skip_all)]
async fn delete_employee_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(raw_id): Path<String>,
    Form(draft): Form<EmployeeDraft>,
) -> HttpResult<(PrivateCookieJar, Redirect)> {
    let id = raw_id
        .parse::<u64>()
        .map_err(|_| HttpError::new(StatusCode::BAD_REQUEST, "invalid employee id"))?;
    let (jar, session_id) = resolve_session(&state, jar);
    state
        .sessions
        .with_session(session_id, |view| {
            view.hr.replace_draft(draft);
            view.hr.delete(id)
        })
        .await;
    Ok((jar, Redirect::to("/")))
}

#[instrument(name = "http.clear_draft", skip_all)]
async fn clear_draft_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> HttpResult<(PrivateCookieJar, Redirect)> {
    let (jar, session_id) = resolve_session(&state, jar);
    state
        .sessions
        .with_session(session_id, |view| view.hr.clear_draft())
        .await;
    Ok((jar, Redirect::to("/")))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        sessions: state.sessions.len().await,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    sessions: usize,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        error!(error = %err, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal server error".to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        build_router(AppState::new(config))
    }

    async fn send(router: &Router, request: Request<Body>) -> Response {
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let raw = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn get_page(cookie: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, cookie: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    async fn open_session(router: &Router) -> (String, String) {
        let response = send(
            router,
            Request::builder().uri("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        (cookie, body_text(response).await)
    }

    #[tokio::test]
    async fn first_visit_shows_sample_roster() {
        let router = test_router();
        let (cookie, page) = open_session(&router).await;
        assert!(cookie.starts_with("roster_session="));
        assert!(page.contains("<td>Ravi Kumar</td>"));
        assert!(page.contains("<td>Amit Sharma</td>"));
    }

    #[tokio::test]
    async fn add_redirects_and_appends_row() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        let response = send(
            &router,
            post_form(
                "/employees",
                &cookie,
                "name=Priya+Nair&age=29&salary=51000&designation=Designer",
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(page.contains(
            "<tr><td>4</td><td>Priya Nair</td><td>29</td><td>51000</td><td>Designer</td>"
        ));
        assert!(page.contains("action=\"/employees/4/delete\""));
        assert!(
            page.contains("<input name=\"name\" type=\"text\" placeholder=\"Name\" value=\"\">")
        );
    }

    #[tokio::test]
    async fn blank_name_alerts_once_and_keeps_draft() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        send(&router, post_form("/employees", &cookie, "name=+++&age=33")).await;

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(page.contains("window.alert(\"Please enter a name.\")"));
        assert!(page.contains("placeholder=\"Age\" value=\"33\""));
        assert!(!page.contains("<tr><td>4</td>"));

        let again = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(!again.contains("window.alert"));
    }

    #[tokio::test]
    async fn malformed_numbers_fall_back_to_zero() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        let form = "name=X&age=abc&salary=&designation=";
        send(&router, post_form("/employees", &cookie, form)).await;

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(page.contains("<td>X</td><td>0</td><td>0</td><td>Not set</td>"));
    }

    #[tokio::test]
    async fn delete_removes_row_and_unknown_id_is_ignored() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        let response = send(&router, post_form("/employees/2/delete", &cookie, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let response = send(&router, post_form("/employees/999/delete", &cookie, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(!page.contains("Sana Patel"));
        assert!(page.contains("<tr><td>2</td><td>Amit Sharma</td>"));
    }

    #[tokio::test]
    async fn typed_draft_survives_a_delete() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        let form = "name=Half+Typed&age=27&salary=&designation=Intern";
        let response = send(&router, post_form("/employees/1/delete", &cookie, form)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(!page.contains("Ravi Kumar"));
        assert!(page.contains("placeholder=\"Name\" value=\"Half Typed\""));
        assert!(page.contains("placeholder=\"Age\" value=\"27\""));
        assert!(page.contains("placeholder=\"Designation\" value=\"Intern\""));
        assert!(!page.contains("<td>Half Typed</td>"));
    }

    #[tokio::test]
    async fn non_numeric_delete_is_bad_request() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;
        let response = send(&router, post_form("/employees/abc/delete", &cookie, "")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn clear_empties_draft_but_not_table() {
        let router = test_router();
        let (cookie, _) = open_session(&router).await;

        send(&router, post_form("/employees", &cookie, "name=&salary=700")).await;
        send(&router, post_form("/draft/clear", &cookie, "salary=700")).await;

        let page = body_text(send(&router, get_page(&cookie)).await).await;
        assert!(page.contains("placeholder=\"Salary (₹)\" value=\"\""));
        assert!(page.contains("<td>Ravi Kumar</td>"));
    }

    #[tokio::test]
    async fn sessions_do_not_share_rosters() {
        let router = test_router();
        let (first, _) = open_session(&router).await;
        let (second, _) = open_session(&router).await;

        send(&router, post_form("/employees/1/delete", &first, "")).await;

        let first_page = body_text(send(&router, get_page(&first)).await).await;
        let second_page = body_text(send(&router, get_page(&second)).await).await;
        assert!(!first_page.contains("Ravi Kumar"));
        assert!(second_page.contains("Ravi Kumar"));
    }

    #[tokio::test]
    async fn health_reports_sessions_and_request_id() {
        let router = test_router();
        open_session(&router).await;
        let response = send(
            &router,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["sessions"], 1);
    }
}
