use crate::parser::metadata;
use crate::parser::types::{
    Document, Folder, Located, Location, MetadataWarning, ParsedDocument, RawRequest,
    StructuralError,
};
use tracing::debug;

/// 代码块的用途
#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    /// 当前请求的 cURL 命令
    Command,
    /// 其他语言或无主的代码块，内容整体跳过
    Opaque,
}

/// 打开中的代码块
#[derive(Debug)]
struct CodeBlock {
    kind: BlockKind,
    fence: char,
    fence_len: usize,
    start_line: usize,
    lines: Vec<String>,
}

/// 行扫描状态机
#[derive(Debug)]
enum State {
    OutsideRequest,
    InMetadata,
    InCodeBlock(CodeBlock),
}

/// 打开中的请求
#[derive(Debug)]
struct PendingRequest {
    request: RawRequest,
    /// 请求所属目录（H1 不会关闭请求）
    folder: usize,
    /// 是否出现过 cURL 代码块（包括空块和未闭合块）
    saw_command_block: bool,
}

/// Markdown 文档解析器
pub struct MarkdownFileParser;

impl MarkdownFileParser {
    /// 从文件路径解析
    pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<ParsedDocument> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_content(&content))
    }

    /// 从字符串内容解析；永不失败，所有问题都记录在结果中
    pub fn parse_content(content: &str) -> ParsedDocument {
        let mut scanner = Scanner::new();
        for (idx, line) in content.lines().enumerate() {
            scanner.feed(idx + 1, line);
        }
        scanner.finish()
    }
}

struct Scanner {
    state: State,
    document: Document,
    current_folder: usize,
    pending: Option<PendingRequest>,
    request_count: usize,
    errors: Vec<Located<StructuralError>>,
    warnings: Vec<Located<MetadataWarning>>,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: State::OutsideRequest,
            document: Document::new(),
            current_folder: 0,
            pending: None,
            request_count: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        match std::mem::replace(&mut self.state, State::OutsideRequest) {
            State::InCodeBlock(block) => self.feed_code_block(block, line),
            state => {
                self.state = state;
                self.feed_outside_block(line_no, line);
            }
        }
    }

    fn feed_code_block(&mut self, mut block: CodeBlock, line: &str) {
        let content = strip_blockquote(line);

        if is_fence_close(content, block.fence, block.fence_len) {
            self.close_block(block);
            self.state = self.resting_state();
            return;
        }

        if block.kind == BlockKind::Command {
            block.lines.push(content.to_string());
        }
        self.state = State::InCodeBlock(block);
    }

    fn feed_outside_block(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();

        if let Some(name) = heading(trimmed, 1) {
            self.open_folder(name);
            return;
        }

        if let Some(name) = heading(trimmed, 2) {
            self.open_request(name, line_no);
            return;
        }

        if let Some((fence, fence_len, lang)) = fence_open(strip_blockquote(line)) {
            self.open_block(fence, fence_len, &lang, line_no);
            return;
        }

        if matches!(self.state, State::InMetadata) {
            if let Some(meta) = metadata::parse_metadata(trimmed) {
                self.apply_metadata(meta, line_no);
            }
        }
        // 其他行（正文、空行、请求外的元数据）忽略
    }

    fn resting_state(&self) -> State {
        if self.pending.is_some() {
            State::InMetadata
        } else {
            State::OutsideRequest
        }
    }

    fn open_folder(&mut self, name: &str) {
        // 重复的 H1 合并到同名目录
        let existing = self
            .document
            .folders
            .iter()
            .position(|f| f.name.as_deref() == Some(name));
        self.current_folder = match existing {
            Some(idx) => idx,
            None => {
                self.document.folders.push(Folder::named(name));
                self.document.folders.len() - 1
            }
        };
        debug!("folder: {}", name);
    }

    fn open_request(&mut self, name: &str, line_no: usize) {
        self.finalize_pending();

        self.request_count += 1;
        let request = RawRequest::new(name, line_no, self.request_count);
        if name.is_empty() {
            let location = self.location_for(self.current_folder, &request);
            self.error(StructuralError::MissingName, location);
        }

        self.pending = Some(PendingRequest {
            request,
            folder: self.current_folder,
            saw_command_block: false,
        });
        self.state = State::InMetadata;
    }

    fn open_block(&mut self, fence: char, fence_len: usize, lang: &str, line_no: usize) {
        let mut kind = BlockKind::Opaque;

        if lang == "curl" {
            match self.pending.as_mut() {
                Some(pending) if pending.saw_command_block => {
                    let location = Self::pending_location(&self.document, pending).with_line(line_no);
                    self.errors.push(Located {
                        item: StructuralError::DuplicateCommand,
                        location,
                    });
                }
                Some(pending) => {
                    pending.saw_command_block = true;
                    kind = BlockKind::Command;
                }
                None => self.warnings.push(Located {
                    item: MetadataWarning::OrphanCommandBlock,
                    location: Location::at_line(line_no),
                }),
            }
        }

        self.state = State::InCodeBlock(CodeBlock {
            kind,
            fence,
            fence_len,
            start_line: line_no,
            lines: Vec::new(),
        });
    }

    fn close_block(&mut self, block: CodeBlock) {
        if block.kind != BlockKind::Command {
            return;
        }
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let command = block.lines.join("\n");
        let command = command.trim();
        if command.is_empty() {
            let location =
                Self::pending_location(&self.document, pending).with_line(block.start_line);
            self.errors.push(Located {
                item: StructuralError::EmptyCommand,
                location,
            });
            return;
        }
        pending.request.command = Some(command.to_string());
    }

    fn apply_metadata(&mut self, meta: metadata::Metadata, line_no: usize) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let warnings = metadata::apply_metadata(meta, &mut pending.request.metadata);
        if warnings.is_empty() {
            return;
        }
        let location = Self::pending_location(&self.document, pending).with_line(line_no);
        for warning in warnings {
            self.warnings.push(Located {
                item: warning,
                location: location.clone(),
            });
        }
    }

    /// 结束当前请求并放入所属目录
    fn finalize_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if !pending.saw_command_block {
            let location = Self::pending_location(&self.document, &pending);
            self.error(StructuralError::MissingCommand, location);
        }

        debug!(
            "request #{} '{}' (line {})",
            pending.request.index, pending.request.name, pending.request.line_number
        );
        self.document.folders[pending.folder]
            .requests
            .push(pending.request);
    }

    fn finish(mut self) -> ParsedDocument {
        if let State::InCodeBlock(block) = std::mem::replace(&mut self.state, State::OutsideRequest)
        {
            let location = match (block.kind, self.pending.as_ref()) {
                (BlockKind::Command, Some(pending)) => Some(
                    Self::pending_location(&self.document, pending).with_line(block.start_line),
                ),
                _ => None,
            };
            match location {
                Some(location) => self.error(StructuralError::UnterminatedCodeBlock, location),
                None => self.warn(
                    MetadataWarning::UnterminatedBlock,
                    Location::at_line(block.start_line),
                ),
            }
        }

        self.finalize_pending();

        if self.request_count == 0 {
            self.error(StructuralError::NoRequests, Location::document());
        }

        ParsedDocument {
            document: self.document,
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn location_for(&self, folder: usize, request: &RawRequest) -> Location {
        Location::of_request(self.document.folders[folder].name.as_deref(), request)
    }

    fn pending_location(document: &Document, pending: &PendingRequest) -> Location {
        Location::of_request(
            document.folders[pending.folder].name.as_deref(),
            &pending.request,
        )
    }

    fn error(&mut self, error: StructuralError, location: Location) {
        self.errors.push(Located {
            item: error,
            location,
        });
    }

    fn warn(&mut self, warning: MetadataWarning, location: Location) {
        self.warnings.push(Located {
            item: warning,
            location,
        });
    }
}

/// 识别 `# name` / `## name`，返回标题文本
fn heading(line: &str, level: usize) -> Option<&str> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes != level {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        // 单独的 "##" 视为缺少名称的请求，单独的 "#" 不是目录
        return (level == 2).then_some("");
    }
    rest.starts_with(' ').then(|| rest.trim())
}

/// 去掉一层引用前缀 `> `（或 `>`）
fn strip_blockquote(line: &str) -> &str {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("> ") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix('>') {
        rest
    } else {
        line
    }
}

/// 识别代码块开始，返回 (围栏字符, 围栏长度, 小写语言标记)
fn fence_open(line: &str) -> Option<(char, usize, String)> {
    let trimmed = line.trim();
    let fence = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let fence_len = trimmed.chars().take_while(|&c| c == fence).count();
    if fence_len < 3 {
        return None;
    }
    let info = trimmed[fence_len..].trim();
    let lang = info
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    Some((fence, fence_len, lang))
}

fn is_fence_close(line: &str, fence: char, fence_len: usize) -> bool {
    let trimmed = line.trim();
    let count = trimmed.chars().take_while(|&c| c == fence).count();
    count >= fence_len && trimmed[count * fence.len_utf8()..].trim().is_empty()
}
