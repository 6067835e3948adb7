use crate::curl::CommandParseError;
use crate::parser::{Located, Location, StructuralError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MdpostError {
    #[error("文档结构错误 ({location}): {source}")]
    Structural {
        source: StructuralError,
        location: Location,
    },

    #[error("cURL 命令解析错误 ({location}): {source}")]
    Command {
        source: CommandParseError,
        location: Location,
    },

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl MdpostError {
    /// 错误所在位置（仅文档相关错误）
    pub fn location(&self) -> Option<&Location> {
        match self {
            MdpostError::Structural { location, .. } | MdpostError::Command { location, .. } => {
                Some(location)
            }
            _ => None,
        }
    }
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for MdpostError {
    fn from(err: anyhow::Error) -> Self {
        MdpostError::Other(err.to_string())
    }
}

impl From<Located<StructuralError>> for MdpostError {
    fn from(err: Located<StructuralError>) -> Self {
        MdpostError::Structural {
            source: err.item,
            location: err.location,
        }
    }
}

/// Result type for mdpost crate
pub type Result<T> = std::result::Result<T, MdpostError>;
