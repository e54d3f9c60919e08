//! Home view: link list, create and delete
//!
//! Every handler re-derives `HomeState` from the API; form posts answer with
//! the rendered page directly and reset the address bar to `/`.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::views::{render_signed_in, render_signed_out};
use crate::config::SiteConfig;
use crate::identity::{IdentityProvider, Session};
use crate::services::LinkManager;

#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    pub url: String,
}

pub struct HomeService;

impl HomeService {
    pub async fn index(
        req: HttpRequest,
        identity: web::Data<Arc<dyn IdentityProvider>>,
        links: web::Data<LinkManager>,
        site: web::Data<SiteConfig>,
    ) -> HttpResponse {
        let Some(session) = identity.current_session(&req) else {
            trace!("Home view without a session");
            return html(render_signed_out(&site, identity.controls()));
        };

        let state = links.load(&session).await;
        html(render_signed_in(
            &site,
            identity.controls(),
            &session,
            &state,
            &request_origin(&req),
            false,
        ))
    }

    pub async fn create_link(
        req: HttpRequest,
        form: web::Form<CreateLinkForm>,
        identity: web::Data<Arc<dyn IdentityProvider>>,
        links: web::Data<LinkManager>,
        site: web::Data<SiteConfig>,
    ) -> HttpResponse {
        let Some(session) = require_session(&req, identity.get_ref()) else {
            return back_home();
        };

        let origin = request_origin(&req);
        let mut state = links.load(&session).await;
        links
            .create_and_refresh(&mut state, &session, &form.url, &origin)
            .await;

        html(render_signed_in(
            &site,
            identity.controls(),
            &session,
            &state,
            &origin,
            true,
        ))
    }

    pub async fn delete_link(
        req: HttpRequest,
        path: web::Path<String>,
        identity: web::Data<Arc<dyn IdentityProvider>>,
        links: web::Data<LinkManager>,
        site: web::Data<SiteConfig>,
    ) -> HttpResponse {
        let Some(session) = require_session(&req, identity.get_ref()) else {
            return back_home();
        };

        let short_code = path.into_inner();
        let mut state = links.load(&session).await;
        links
            .delete_and_refresh(&mut state, &session, &short_code)
            .await;

        html(render_signed_in(
            &site,
            identity.controls(),
            &session,
            &state,
            &request_origin(&req),
            true,
        ))
    }
}

fn require_session(req: &HttpRequest, identity: &Arc<dyn IdentityProvider>) -> Option<Session> {
    let session = identity.current_session(req);
    if session.is_none() {
        debug!("Rejected {} {} without a session", req.method(), req.path());
    }
    session
}

/// `scheme://host` as the browser sees it
fn request_origin(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn back_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Home 路由配置，需要最后注册（scope 前缀为空）
pub fn home_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(HomeService::index))
        .route("/", web::head().to(HomeService::index))
        .route("/links", web::post().to(HomeService::create_link))
        .route(
            "/links/{short_code}/delete",
            web::post().to(HomeService::delete_link),
        )
}
