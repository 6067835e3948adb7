use crate::parser::markdown_file::MarkdownFileParser;
use crate::parser::types::{Location, MetadataWarning, ParsedDocument};
use crate::variable::VariableDetector;
use serde::Serialize;

/// 单条诊断
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub location: Location,
    pub message: String,
}

/// 单个请求的概要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSummary {
    pub name: String,
    pub folder: Option<String>,
    pub line: usize,
    pub has_description: bool,
    pub has_command: bool,
    pub requires: Vec<String>,
    pub save_response_variable: Option<String>,
    /// 命令中引用的占位符（首次出现顺序）
    pub variables_used: Vec<String>,
}

/// 结构校验报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub is_valid: bool,
    pub requests: Vec<RequestSummary>,
}

impl ValidationReport {
    pub fn folder_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for summary in &self.requests {
            if let Some(folder) = summary.folder.as_deref() {
                if !names.contains(&folder) {
                    names.push(folder);
                }
            }
        }
        names
    }
}

/// 结构校验器：只做文档结构检查，不解析 cURL 命令
pub struct Validator;

impl Validator {
    pub fn validate(content: &str) -> ValidationReport {
        let parsed = MarkdownFileParser::parse_content(content);
        Self::from_parsed(&parsed)
    }

    pub fn from_parsed(parsed: &ParsedDocument) -> ValidationReport {
        let errors: Vec<Diagnostic> = parsed
            .errors
            .iter()
            .map(|e| Diagnostic {
                code: e.item.code(),
                location: e.location.clone(),
                message: e.item.to_string(),
            })
            .collect();

        let mut warnings: Vec<Diagnostic> = parsed
            .warnings
            .iter()
            .map(|w| Diagnostic {
                code: w.item.code(),
                location: w.location.clone(),
                message: w.item.to_string(),
            })
            .collect();

        let mut requests = Vec::new();
        for (folder, request) in parsed.document.requests() {
            let folder_name = folder.name.as_deref();

            if request.metadata.description.is_none() {
                let warning = MetadataWarning::MissingDescription;
                warnings.push(Diagnostic {
                    code: warning.code(),
                    location: Location::of_request(folder_name, request),
                    message: warning.to_string(),
                });
            }

            requests.push(RequestSummary {
                name: request.display_name(),
                folder: folder_name.map(str::to_string),
                line: request.line_number,
                has_description: request.metadata.description.is_some(),
                has_command: request.command.is_some(),
                requires: request.metadata.requires.clone(),
                save_response_variable: request.metadata.save_response_variable.clone(),
                variables_used: request
                    .command
                    .as_deref()
                    .map(VariableDetector::collect)
                    .unwrap_or_default(),
            });
        }

        // 根目录在前，按行号恢复文档顺序
        requests.sort_by_key(|r| r.line);

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            requests,
        }
    }
}
