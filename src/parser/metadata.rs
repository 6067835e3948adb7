use crate::parser::types::{MetadataWarning, RequestMetadata};
use crate::variable::VariableDetector;
use regex::Regex;
use std::sync::OnceLock;

/// 单行元数据：`**Field:** value`
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    Description(String),
    Requires(Vec<String>),
    SaveResponseVariable(String),
    /// 未识别的字段名（向前兼容，只给出警告）
    Unknown(String),
}

fn metadata_regex() -> &'static Regex {
    static METADATA_REGEX: OnceLock<Regex> = OnceLock::new();
    METADATA_REGEX
        .get_or_init(|| Regex::new(r"^\*\*([^*:]+):\*\*\s*(.*)$").expect("valid metadata regex"))
}

/// 主解析函数：不是元数据行时返回 None
pub fn parse_metadata(line: &str) -> Option<Metadata> {
    let caps = metadata_regex().captures(line.trim())?;
    let field = caps.get(1)?.as_str().trim();
    let value = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

    // 字段名大小写不敏感，多个空白视为一个
    let key = field
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let metadata = match key.as_str() {
        "description" => Metadata::Description(value.to_string()),
        "requires" => Metadata::Requires(value.split(',').map(|s| s.trim().to_string()).collect()),
        "save response variable" => Metadata::SaveResponseVariable(value.to_string()),
        _ => Metadata::Unknown(field.to_string()),
    };
    Some(metadata)
}

/// 应用元数据到 RequestMetadata，返回产生的警告
pub fn apply_metadata(metadata: Metadata, target: &mut RequestMetadata) -> Vec<MetadataWarning> {
    let mut warnings = Vec::new();

    match metadata {
        Metadata::Description(text) => {
            if !text.is_empty() {
                target.description = Some(text);
            }
        }
        Metadata::Requires(entries) => {
            // "**Requires:**" 后为空表示没有依赖
            if entries.len() == 1 && entries[0].is_empty() {
                return warnings;
            }
            for entry in entries {
                if !VariableDetector::is_valid_name(&entry) {
                    warnings.push(MetadataWarning::MalformedRequires(entry));
                } else if !target.requires.contains(&entry) {
                    target.requires.push(entry);
                }
            }
        }
        Metadata::SaveResponseVariable(name) => {
            if name.is_empty() {
                return warnings;
            }
            if !VariableDetector::is_valid_name(&name) {
                warnings.push(MetadataWarning::InvalidSaveVariable(name));
                return warnings;
            }
            if target.save_response_variable.is_some() {
                warnings.push(MetadataWarning::DuplicateSaveVariable(name.clone()));
            }
            target.save_response_variable = Some(name);
        }
        Metadata::Unknown(field) => {
            warnings.push(MetadataWarning::UnrecognizedField(field));
        }
    }

    warnings
}
