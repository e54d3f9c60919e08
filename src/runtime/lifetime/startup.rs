use actix_web::middleware::Compress;
use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::middleware::CsrfGuard;
use crate::api::services::{AppStartTime, health_routes, home_routes, redirect_routes};
use crate::client::{HttpLinkApi, LinkApi};
use crate::config::{SiteConfig, StaticConfig};
use crate::identity::{IdentityProvider, JwtSessionProvider};
use crate::resolver::RedirectResolver;
use crate::services::LinkManager;

/// Everything the HTTP workers share
#[derive(Clone)]
pub struct StartupContext {
    pub api: Arc<dyn LinkApi>,
    pub identity: Arc<dyn IdentityProvider>,
    pub resolver: RedirectResolver,
    pub link_manager: LinkManager,
    pub site: SiteConfig,
    pub app_start_time: AppStartTime,
}

impl StartupContext {
    pub fn new(
        api: Arc<dyn LinkApi>,
        identity: Arc<dyn IdentityProvider>,
        site: SiteConfig,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            resolver: RedirectResolver::new(api.clone(), redirect_delay),
            link_manager: LinkManager::new(api.clone()),
            api,
            identity,
            site,
            app_start_time: AppStartTime::now(),
        }
    }

    /// 注册共享状态和所有路由；home scope 前缀为空，必须最后注册。
    /// Home 的表单只靠 cookie 认证，由 `CsrfGuard` 拦截跨站提交
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.identity.clone()))
            .app_data(web::Data::new(self.link_manager.clone()))
            .app_data(web::Data::new(self.resolver.clone()))
            .app_data(web::Data::new(self.site.clone()))
            .app_data(web::Data::new(self.app_start_time.clone()))
            .service(health_routes())
            .service(redirect_routes())
            .service(
                home_routes()
                    .wrap(CsrfGuard)
                    .wrap(Compress::default()),
            );
    }
}

/// 准备服务器启动的上下文
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let api = HttpLinkApi::from_config(&config.api).context("Failed to build link API client")?;
    info!("Link API: {}", api.base_url());

    let identity =
        JwtSessionProvider::from_config(&config.auth).context("Failed to set up session verification")?;
    if config.auth.jwt_public_key.is_none() && config.auth.jwt_secret.is_none() {
        warn!("No session verification key configured, every visitor is treated as signed out");
    }

    let ctx = StartupContext::new(
        Arc::new(api),
        Arc::new(identity),
        config.site.clone(),
        Duration::from_millis(config.redirect.delay_ms),
    );

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());
    Ok(ctx)
}
