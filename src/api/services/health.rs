use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::trace;

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: i64,
    pub version: &'static str,
}

/// Liveness only: the remote API is deliberately not probed here
pub struct HealthService;

impl HealthService {
    pub async fn health_check(app_start_time: web::Data<AppStartTime>) -> impl Responder {
        trace!("Received health check request");

        let uptime_secs = (chrono::Utc::now() - app_start_time.start_datetime)
            .num_seconds()
            .max(0);

        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            uptime_secs,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
