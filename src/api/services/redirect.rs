//! Redirect view
//!
//! The response is streamed: the loading shell goes out immediately, the
//! lookup runs behind the pacing delay, then the terminal fragment (a
//! navigation or the not-found card) and the closing markup follow. If the
//! client goes away first, actix drops the body stream, which drops the
//! `ScheduledLookup` and aborts the pending lookup.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use bytes::Bytes;
use futures_util::future::ready;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, trace};

use crate::api::views::{render_outcome, render_redirect_shell};
use crate::config::SiteConfig;
use crate::resolver::{RedirectResolver, ResolveOutcome};

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<RedirectResolver>,
        site: web::Data<SiteConfig>,
    ) -> HttpResponse {
        let short_code = path.into_inner();
        trace!("Redirect view requested for {}", short_code);

        let mut lookup = resolver.schedule(&short_code);
        let page = render_redirect_shell(&site, &short_code);
        let site = site.into_inner();
        let tail = page.tail;

        let shell = stream::once(ready(Ok::<_, actix_web::Error>(Bytes::from(page.head))));
        let rest = stream::once(async move {
            let outcome = lookup.outcome().await;
            match &outcome {
                Some(ResolveOutcome::Navigate(target)) => {
                    debug!("Short code {} resolved to {}", lookup.short_code(), target)
                }
                _ => debug!("Short code {} did not resolve", lookup.short_code()),
            }

            let mut fragment = render_outcome(&site, lookup.short_code(), outcome.as_ref());
            fragment.push_str(&tail);
            Ok::<_, actix_web::Error>(Bytes::from(fragment))
        });

        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .streaming(shell.chain(rest))
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/r").route("/{short_code}", web::get().to(RedirectService::handle_redirect))
}
