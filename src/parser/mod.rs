pub mod markdown_file;
pub mod metadata;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use markdown_file::MarkdownFileParser;
pub use types::{
    Document, Folder, Located, Location, MetadataWarning, ParsedDocument, RawRequest,
    RequestMetadata, StructuralError,
};
pub use validator::{Diagnostic, RequestSummary, ValidationReport, Validator};

/// 从文件路径解析 Markdown 文档
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<ParsedDocument> {
    MarkdownFileParser::parse_file(path)
}

/// 从字符串内容解析 Markdown 文档
pub fn parse_content(content: &str) -> ParsedDocument {
    MarkdownFileParser::parse_content(content)
}
