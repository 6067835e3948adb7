use crate::collection::{Collection, CollectionBuilder, ConvertOptions};
use crate::curl::CommandParser;
use crate::error::{MdpostError, Result};
use crate::parser::{self, Location, ParsedDocument, ValidationReport, Validator};
use std::path::Path;
use tracing::warn;

/// 将 Markdown 文本转换为集合
///
/// 遇到第一个结构错误或 cURL 解析错误即失败；元数据警告只记录日志。
pub fn convert(content: &str, options: &ConvertOptions) -> Result<Collection> {
    convert_parsed(parser::parse_content(content), options)
}

/// 读取文件并转换
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<Collection> {
    convert_parsed(parser::parse_file(path)?, options)
}

fn convert_parsed(parsed: ParsedDocument, options: &ConvertOptions) -> Result<Collection> {
    for warning in &parsed.warnings {
        warn!("{}", warning);
    }

    if let Some(err) = first_error(&parsed) {
        return Err(err);
    }

    let document = parsed.into_document()?;
    CollectionBuilder::new(options).build(&document)
}

/// 按文档顺序返回第一个错误
///
/// 位于第一个结构错误之前的请求先解析命令，命令错误在前则优先报告。
fn first_error(parsed: &ParsedDocument) -> Option<MdpostError> {
    let structural = parsed
        .errors
        .iter()
        .min_by_key(|e| e.location.line.unwrap_or(usize::MAX));
    let limit = structural
        .and_then(|e| e.location.line)
        .unwrap_or(usize::MAX);

    // 重复的 H1 会合并目录，目录顺序不等于文档顺序
    let mut requests: Vec<_> = parsed.document.requests().collect();
    requests.sort_by_key(|(_, request)| request.line_number);

    for (folder, request) in requests {
        if request.line_number >= limit {
            break;
        }
        let Some(command) = request.command.as_deref() else {
            continue;
        };
        if let Err(source) = CommandParser::parse(command) {
            return Some(MdpostError::Command {
                source,
                location: Location::of_request(folder.name.as_deref(), request),
            });
        }
    }

    structural.cloned().map(MdpostError::from)
}

/// 只做结构校验，收集全部错误和警告，不解析 cURL 命令
pub fn validate_structure(content: &str) -> ValidationReport {
    Validator::validate(content)
}
