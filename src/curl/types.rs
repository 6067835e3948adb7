use std::fmt;
use std::str::FromStr;

/// 支持的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// 方法决策表：(显式方法, 是否有 body) → 最终方法
    pub fn resolve(explicit: Option<HttpMethod>, has_body: bool) -> HttpMethod {
        match (explicit, has_body) {
            (Some(method), _) => method,
            (None, true) => HttpMethod::Post,
            (None, false) => HttpMethod::Get,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(CommandParseError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求体，按内容分类
#[derive(Debug, Clone, PartialEq)]
pub enum CommandBody {
    /// 合法 JSON（保留原始 key 顺序和数字字面量）
    Json(serde_json::Value),
    /// 非 JSON，原样保留
    Raw(String),
}

impl CommandBody {
    /// 严格 JSON 解析，失败则视为纯文本
    pub fn classify(payload: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(value) => CommandBody::Json(value),
            Err(_) => CommandBody::Raw(payload.to_string()),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, CommandBody::Json(_))
    }

    /// 输出文本：JSON 以 2 空格缩进格式化，纯文本原样返回
    pub fn render(&self) -> String {
        match self {
            CommandBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            CommandBody::Raw(text) => text.clone(),
        }
    }
}

/// 解析后的 cURL 命令
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub method: HttpMethod,

    /// 命令中书写的完整 URL（去掉 #fragment）
    pub raw_url: String,

    /// 不含查询串的 URL，占位符保持原样
    pub url: String,

    /// Headers 列表，保持原始顺序（允许重复）
    pub headers: Vec<(String, String)>,

    pub body: Option<CommandBody>,

    /// 查询参数，保持原始顺序，不做百分号解码
    pub query: Vec<(String, String)>,
}

impl ParsedCommand {
    /// 按名称查找 header（大小写不敏感，返回第一个）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// cURL 命令解析错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Command block is empty")]
    EmptyCommand,

    #[error("Unbalanced quotes in command")]
    UnbalancedQuotes,

    #[error("Missing value after flag '{flag}'")]
    MissingValue { flag: String },

    #[error("Unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),

    #[error("Invalid header '{0}': expected 'Name: value'")]
    InvalidHeader(String),

    #[error("No URL found in command")]
    MissingUrl,
}
