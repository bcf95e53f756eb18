mod handlers;
mod middleware;
mod models;
mod services;
mod utils;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::env;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    handlers::{admin, applications, auth, interviews, notifications},
    middleware::auth::auth_middleware,
    services::notification::{
        EventSender, Mailer, NotificationWorker, SmtpConfig,
    },
    services::reports::ReportService,
    utils::database::create_pool,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_secret: String,
    pub events: EventSender,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admissions_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    let db = create_pool(&database_url).await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    // Notification worker: transitions commit first, then events land here.
    // Without SMTP configured the worker logs rendered mail instead.
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
    let mailer = SmtpConfig::from_env().map(Mailer::new);
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set, email notifications will be logged only");
    }
    tokio::spawn(NotificationWorker::new(event_rx, mailer).run());

    let state = AppState {
        db,
        jwt_secret,
        events: event_tx,
    };

    let cors_origin =
        env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(axum::http::header::HeaderValue::from_static("*"))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    } else {
        CorsLayer::new()
            .allow_origin(cors_origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    };

    let protected_routes = Router::new()
        .route("/applications", post(applications::create_application))
        .route("/applications", get(applications::get_applications))
        .route("/applications/:id", get(applications::get_application))
        .route("/admin/applications", get(admin::get_all_applications))
        .route(
            "/admin/applications/:id/approve",
            post(admin::approve_application),
        )
        .route(
            "/admin/applications/:id/reject",
            post(admin::reject_application),
        )
        .route(
            "/admin/applications/:id/interviews/:slot/schedule",
            post(admin::schedule_interview),
        )
        .route(
            "/admin/applications/:id/select",
            post(admin::select_application),
        )
        .route("/admin/analytics", get(admin::get_analytics))
        .route("/admin/users", get(auth::list_users))
        .route("/admin/users/:user_id/roles", put(auth::update_roles))
        .route(
            "/admin/notifications/daily-summary",
            post(notifications::trigger_daily_summary),
        )
        .route(
            "/admin/notifications/interview-reminders",
            post(notifications::trigger_interview_reminders),
        )
        .route(
            "/interviewer/assignments",
            get(interviews::get_assignments),
        )
        .route(
            "/interviewer/applications/:id/interviews/:slot/outcome",
            post(interviews::record_outcome),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .layer(cors)
        .with_state(state.clone());

    // Background report scheduler: daily admin summary + hourly interview
    // reminder sweep.
    let report_db = state.db.clone();
    let report_events = state.events.clone();
    tokio::spawn(async move {
        use tokio_cron_scheduler::{Job, JobScheduler};

        let sched = JobScheduler::new()
            .await
            .expect("Failed to create scheduler");

        let daily_db = report_db.clone();
        let daily_events = report_events.clone();
        let daily_job = Job::new_async("0 0 9 * * *", move |_uuid, _l| {
            let db = daily_db.clone();
            let events = daily_events.clone();
            Box::pin(async move {
                let reports = ReportService::new(db, events);
                if let Err(e) = reports.send_daily_summary().await {
                    tracing::error!("Failed to send daily summary: {}", e);
                }
            })
        })
        .expect("Failed to create daily summary job");

        let hourly_db = report_db.clone();
        let hourly_events = report_events.clone();
        let reminder_job = Job::new_async("0 0 * * * *", move |_uuid, _l| {
            let db = hourly_db.clone();
            let events = hourly_events.clone();
            Box::pin(async move {
                let reports = ReportService::new(db, events);
                if let Err(e) = reports.send_interview_reminders().await {
                    tracing::error!("Failed to send interview reminders: {}", e);
                }
            })
        })
        .expect("Failed to create reminder job");

        sched.add(daily_job).await.expect("Failed to add job");
        sched.add(reminder_job).await.expect("Failed to add job");
        sched.start().await.expect("Failed to start scheduler");

        tracing::info!("Report scheduler started - daily summary at 9 AM, reminders hourly");

        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
        }
    });

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
    tracing::info!("Server running on http://0.0.0.0:8000");

    axum::serve(listener, app).await?;

    Ok(())
}
