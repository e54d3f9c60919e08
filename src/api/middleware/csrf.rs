//! CSRF 防护中间件
//!
//! Home 页面的表单只靠 session cookie 认证，所以修改类请求必须来自本站。
//! 判断依据是浏览器自动附带、页面脚本无法伪造的头：
//! - `Sec-Fetch-Site` 存在时必须是 `same-origin` 或 `none`
//! - `Origin`（没有时退回 `Referer`）的 host 必须和请求 host 一致
//!
//! 跳过规则：
//! - 安全方法（GET, HEAD, OPTIONS）
//! - Bearer Token 认证（非浏览器调用方）
//!
//! 两类头都没有的请求放行：这样的客户端不会自动携带跨站 cookie。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Method,
        header::{self, CONTENT_TYPE},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{trace, warn};
use url::Url;

const SEC_FETCH_SITE: &str = "sec-fetch-site";

/// CSRF 防护中间件
#[derive(Clone, Default)]
pub struct CsrfGuard;

impl<S, B> Transform<S, ServiceRequest> for CsrfGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CsrfMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct CsrfMiddleware<S> {
    service: Rc<S>,
}

/// Verdict on where a mutating request came from
#[derive(Debug, PartialEq, Eq)]
enum RequestSource {
    SameOrigin,
    /// 没有任何来源头
    Unknown,
    CrossSite(String),
}

impl<S, B> CsrfMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// 返回 403 Forbidden 响应
    fn handle_csrf_error(req: ServiceRequest, reason: &str) -> ServiceResponse<EitherBody<B>> {
        warn!(
            "Rejected cross-site {} {}: {}",
            req.method(),
            req.path(),
            reason
        );
        req.into_response(
            HttpResponse::Forbidden()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Cross-site request rejected")
                .map_into_right_body(),
        )
    }
}

/// 检查是否是安全方法（不修改资源）
fn is_safe_method(method: &Method) -> bool {
    matches!(method, &Method::GET | &Method::HEAD | &Method::OPTIONS)
}

/// 浏览器不会给跨站表单加 Authorization 头
fn is_bearer_auth(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|s| s.starts_with("Bearer "))
}

/// `host[:port]` of an Origin or Referer value, port only when explicit
fn source_authority(value: &str) -> Option<String> {
    let url = Url::parse(value).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn classify(req: &ServiceRequest) -> RequestSource {
    let headers = req.headers();

    if let Some(site) = headers
        .get(SEC_FETCH_SITE)
        .and_then(|h| h.to_str().ok())
        .filter(|site| !matches!(*site, "same-origin" | "none"))
    {
        return RequestSource::CrossSite(format!("Sec-Fetch-Site: {}", site));
    }

    let source = headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
        .and_then(|h| h.to_str().ok());
    let Some(source) = source else {
        return RequestSource::Unknown;
    };

    let info = req.connection_info();
    match source_authority(source) {
        Some(authority) if authority.eq_ignore_ascii_case(info.host()) => RequestSource::SameOrigin,
        // 包括 Origin: null
        _ => RequestSource::CrossSite(format!("source {} != host {}", source, info.host())),
    }
}

impl<S, B> Service<ServiceRequest> for CsrfMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // 1. 跳过安全方法（GET, HEAD, OPTIONS）
            if is_safe_method(req.method()) {
                trace!("CSRF skipped: safe method {}", req.method());
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 2. 跳过 Bearer Token 认证的请求
            if is_bearer_auth(&req) {
                trace!("CSRF skipped: Bearer token authentication");
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 3. Cookie 认证需要来源校验
            match classify(&req) {
                RequestSource::CrossSite(reason) => Ok(Self::handle_csrf_error(req, &reason)),
                source => {
                    trace!("CSRF check passed: {:?}", source);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}
