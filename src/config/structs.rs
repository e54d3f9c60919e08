use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：KSHORT__API__BASE_URL=https://api.example.com
pub const ENV_PREFIX: &str = "KSHORT";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量
/// - api: 远端 Link API 地址与超时
/// - site: 展示用域名与标题
/// - redirect: 跳转页的等待时间
/// - auth: 会话令牌校验与登录/登出地址
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：KSHORT，分隔符：__
    pub fn load(path: &str) -> crate::errors::Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::errors::KshortError::config(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Startup sanity checks.
    ///
    /// Returns warnings for settings that degrade the app but still let it run;
    /// returns an error when the link API address is unusable.
    pub fn validate(&self) -> crate::errors::Result<Vec<String>> {
        let mut warnings = Vec::new();

        let base = url::Url::parse(&self.api.base_url).map_err(|e| {
            crate::errors::KshortError::config(format!(
                "api.base_url '{}' is not a valid URL: {}",
                self.api.base_url, e
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(crate::errors::KshortError::config(format!(
                "api.base_url must use http or https, got '{}'",
                base.scheme()
            )));
        }

        if self.auth.jwt_public_key.is_none() && self.auth.jwt_secret.is_none() {
            warnings.push(
                "Neither auth.jwt_public_key nor auth.jwt_secret is set; every visitor will be treated as signed out"
                    .to_string(),
            );
        }
        if self.auth.sign_in_url.is_empty() {
            warnings.push("auth.sign_in_url is empty; the sign-in button will not lead anywhere".to_string());
        }
        if self.site.display_domain.is_empty() {
            warnings.push("site.display_domain is empty; link list entries will show bare paths".to_string());
        }

        Ok(warnings)
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// 远端 Link API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

/// 页面展示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_display_domain")]
    pub display_domain: String,
    #[serde(default = "default_site_title")]
    pub title: String,
}

/// 跳转页配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Pause before the lookup so the loading page is visible. 0 disables it.
    #[serde(default = "default_redirect_delay_ms")]
    pub delay_ms: u64,
}

/// 会话校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// RS256 public key (PEM) published by the identity provider
    #[serde(default)]
    pub jwt_public_key: Option<String>,
    /// HS256 shared secret, used when no public key is configured
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default = "default_sign_in_url")]
    pub sign_in_url: String,
    #[serde(default = "default_sign_out_url")]
    pub sign_out_url: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_api_timeout_secs() -> u64 {
    10
}

fn default_display_domain() -> String {
    "kshort.vercel.app".to_string()
}

fn default_site_title() -> String {
    "URL Shortener".to_string()
}

fn default_redirect_delay_ms() -> u64 {
    1500
}

fn default_session_cookie() -> String {
    "__session".to_string()
}

fn default_sign_in_url() -> String {
    "/sign-in".to_string()
}

fn default_sign_out_url() -> String {
    "/sign-out".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            display_domain: default_display_domain(),
            title: default_site_title(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            jwt_public_key: None,
            jwt_secret: None,
            issuer: None,
            sign_in_url: default_sign_in_url(),
            sign_out_url: default_sign_out_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
