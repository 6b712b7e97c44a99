use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum FoodgramError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Serialization(String),
    DocumentRender(String),
    ShortLinkExhausted(String),
}

impl FoodgramError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            FoodgramError::DatabaseConfig(_) => "E001",
            FoodgramError::DatabaseConnection(_) => "E002",
            FoodgramError::DatabaseOperation(_) => "E003",
            FoodgramError::FileOperation(_) => "E004",
            FoodgramError::Validation(_) => "E005",
            FoodgramError::NotFound(_) => "E006",
            FoodgramError::Unauthorized(_) => "E007",
            FoodgramError::Forbidden(_) => "E008",
            FoodgramError::Conflict(_) => "E009",
            FoodgramError::Serialization(_) => "E010",
            FoodgramError::DocumentRender(_) => "E011",
            FoodgramError::ShortLinkExhausted(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            FoodgramError::DatabaseConfig(_) => "Database Configuration Error",
            FoodgramError::DatabaseConnection(_) => "Database Connection Error",
            FoodgramError::DatabaseOperation(_) => "Database Operation Error",
            FoodgramError::FileOperation(_) => "File Operation Error",
            FoodgramError::Validation(_) => "Validation Error",
            FoodgramError::NotFound(_) => "Resource Not Found",
            FoodgramError::Unauthorized(_) => "Unauthorized",
            FoodgramError::Forbidden(_) => "Forbidden",
            FoodgramError::Conflict(_) => "Conflict",
            FoodgramError::Serialization(_) => "Serialization Error",
            FoodgramError::DocumentRender(_) => "Document Render Error",
            FoodgramError::ShortLinkExhausted(_) => "Short Link Generation Exhausted",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            FoodgramError::DatabaseConfig(msg)
            | FoodgramError::DatabaseConnection(msg)
            | FoodgramError::DatabaseOperation(msg)
            | FoodgramError::FileOperation(msg)
            | FoodgramError::Validation(msg)
            | FoodgramError::NotFound(msg)
            | FoodgramError::Unauthorized(msg)
            | FoodgramError::Forbidden(msg)
            | FoodgramError::Conflict(msg)
            | FoodgramError::Serialization(msg)
            | FoodgramError::DocumentRender(msg)
            | FoodgramError::ShortLinkExhausted(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            FoodgramError::Validation(_) | FoodgramError::Conflict(_) => StatusCode::BAD_REQUEST,
            FoodgramError::NotFound(_) => StatusCode::NOT_FOUND,
            FoodgramError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            FoodgramError::Forbidden(_) => StatusCode::FORBIDDEN,
            FoodgramError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 启动失败）
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

impl fmt::Display for FoodgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FoodgramError {}

// 便捷的构造函数
impl FoodgramError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        FoodgramError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        FoodgramError::Serialization(msg.into())
    }

    pub fn document_render<T: Into<String>>(msg: T) -> Self {
        FoodgramError::DocumentRender(msg.into())
    }

    pub fn short_link_exhausted<T: Into<String>>(msg: T) -> Self {
        FoodgramError::ShortLinkExhausted(msg.into())
    }
}

impl From<sea_orm::DbErr> for FoodgramError {
    fn from(err: sea_orm::DbErr) -> Self {
        FoodgramError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FoodgramError {
    fn from(err: std::io::Error) -> Self {
        FoodgramError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FoodgramError {
    fn from(err: serde_json::Error) -> Self {
        FoodgramError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FoodgramError>;
