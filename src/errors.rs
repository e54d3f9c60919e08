use std::fmt;

#[derive(Debug, Clone)]
pub enum KshortError {
    Config(String),
    Transport(String),
    Upstream { status: u16, message: String },
    Decode(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Io(String),
}

impl KshortError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            KshortError::Config(_) => "E001",
            KshortError::Transport(_) => "E002",
            KshortError::Upstream { .. } => "E003",
            KshortError::Decode(_) => "E004",
            KshortError::Validation(_) => "E005",
            KshortError::NotFound(_) => "E006",
            KshortError::Unauthorized(_) => "E007",
            KshortError::Io(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            KshortError::Config(_) => "Configuration Error",
            KshortError::Transport(_) => "Transport Error",
            KshortError::Upstream { .. } => "Upstream API Error",
            KshortError::Decode(_) => "Decode Error",
            KshortError::Validation(_) => "Validation Error",
            KshortError::NotFound(_) => "Resource Not Found",
            KshortError::Unauthorized(_) => "Unauthorized",
            KshortError::Io(_) => "IO Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            KshortError::Config(msg) => msg,
            KshortError::Transport(msg) => msg,
            KshortError::Upstream { message, .. } => message,
            KshortError::Decode(msg) => msg,
            KshortError::Validation(msg) => msg,
            KshortError::NotFound(msg) => msg,
            KshortError::Unauthorized(msg) => msg,
            KshortError::Io(msg) => msg,
        }
    }

    /// Upstream HTTP status, if the error came from a non-2xx API response
    pub fn status(&self) -> Option<u16> {
        match self {
            KshortError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KshortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KshortError {}

// 便捷的构造函数
impl KshortError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        KshortError::Config(msg.into())
    }

    pub fn transport<T: Into<String>>(msg: T) -> Self {
        KshortError::Transport(msg.into())
    }

    pub fn upstream<T: Into<String>>(status: u16, msg: T) -> Self {
        KshortError::Upstream {
            status,
            message: msg.into(),
        }
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        KshortError::Decode(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        KshortError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        KshortError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        KshortError::Unauthorized(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        KshortError::Io(msg.into())
    }
}

impl From<reqwest::Error> for KshortError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            KshortError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            KshortError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            KshortError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for KshortError {
    fn from(err: serde_json::Error) -> Self {
        KshortError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for KshortError {
    fn from(err: std::io::Error) -> Self {
        KshortError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for KshortError {
    fn from(err: config::ConfigError) -> Self {
        KshortError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KshortError>;
