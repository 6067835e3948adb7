use serde::Serialize;
use std::fmt;

/// 整个 Markdown 文档的解析结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// 第一个为隐式根目录（name 为 None），其后为 H1 目录
    pub folders: Vec<Folder>,
}

impl Document {
    /// 创建只包含根目录的空文档
    pub fn new() -> Self {
        Self {
            folders: vec![Folder::root()],
        }
    }

    /// 按文档顺序遍历所有请求（目录优先，其次请求）
    pub fn requests(&self) -> impl Iterator<Item = (&Folder, &RawRequest)> {
        self.folders
            .iter()
            .flat_map(|folder| folder.requests.iter().map(move |req| (folder, req)))
    }

    pub fn request_count(&self) -> usize {
        self.folders.iter().map(|f| f.requests.len()).sum()
    }

    /// 含有请求的具名目录数量
    pub fn folder_count(&self) -> usize {
        self.folders
            .iter()
            .filter(|f| f.name.is_some() && !f.requests.is_empty())
            .count()
    }
}

/// 目录（来自 H1 标题）
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    /// 目录名称，根目录为 None
    pub name: Option<String>,

    pub requests: Vec<RawRequest>,
}

impl Folder {
    pub fn root() -> Self {
        Self {
            name: None,
            requests: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            requests: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }
}

/// 单个请求（来自 H2 标题）
#[derive(Debug, Clone, PartialEq)]
pub struct RawRequest {
    /// 请求名称，缺失时为空字符串（此时会报告结构错误）
    pub name: String,

    pub metadata: RequestMetadata,

    /// cURL 代码块内容
    pub command: Option<String>,

    /// H2 标题所在行号（从 1 开始）
    pub line_number: usize,

    /// 请求在文档中的序号（从 1 开始）
    pub index: usize,
}

impl RawRequest {
    pub fn new(name: impl Into<String>, line_number: usize, index: usize) -> Self {
        Self {
            name: name.into(),
            metadata: RequestMetadata::default(),
            command: None,
            line_number,
            index,
        }
    }

    /// 用于报告的名称，缺失时使用序号
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("#{}", self.index)
        } else {
            self.name.clone()
        }
    }
}

/// 请求元数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestMetadata {
    /// **Description:**
    pub description: Option<String>,

    /// **Requires:**（有序、去重）
    pub requires: Vec<String>,

    /// **Save Response Variable:**
    pub save_response_variable: Option<String>,
}

/// 诊断信息的位置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    pub fn document() -> Self {
        Self::default()
    }

    pub fn at_line(line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    /// 请求位置；名称缺失时只记录序号
    pub fn of_request(folder: Option<&str>, request: &RawRequest) -> Self {
        Self {
            folder: folder.map(str::to_string),
            request: (!request.name.is_empty()).then(|| request.name.clone()),
            index: Some(request.index),
            line: Some(request.line_number),
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(folder) = &self.folder {
            parts.push(format!("folder '{}'", folder));
        }
        match (&self.request, self.index) {
            (Some(name), _) => parts.push(format!("request '{}'", name)),
            (None, Some(index)) => parts.push(format!("request #{}", index)),
            (None, None) => {}
        }
        if let Some(line) = self.line {
            parts.push(format!("line {}", line));
        }

        if parts.is_empty() {
            f.write_str("document")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// 附带位置的诊断项
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub item: T,
    pub location: Location,
}

impl<T: fmt::Display> fmt::Display for Located<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.item, self.location)
    }
}

/// 结构错误：`convert` 遇到即失败，`validate_structure` 中全部收集
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("No requests found in document")]
    NoRequests,

    #[error("Request header has no name")]
    MissingName,

    #[error("Request has no curl command block")]
    MissingCommand,

    #[error("Request has more than one curl command block")]
    DuplicateCommand,

    #[error("Curl command block is empty")]
    EmptyCommand,

    #[error("Curl command block is not terminated")]
    UnterminatedCodeBlock,
}

impl StructuralError {
    pub fn code(&self) -> &'static str {
        match self {
            StructuralError::NoRequests => "no-requests",
            StructuralError::MissingName => "missing-name",
            StructuralError::MissingCommand => "missing-command",
            StructuralError::DuplicateCommand => "duplicate-command",
            StructuralError::EmptyCommand => "empty-command",
            StructuralError::UnterminatedCodeBlock => "unterminated-code-block",
        }
    }
}

/// 元数据警告：永不致命
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataWarning {
    #[error("Unrecognized metadata field '{0}' ignored")]
    UnrecognizedField(String),

    #[error("Malformed entry '{0}' in Requires list ignored")]
    MalformedRequires(String),

    #[error("Invalid Save Response Variable name '{0}' ignored")]
    InvalidSaveVariable(String),

    #[error("Save Response Variable declared more than once; '{0}' is used")]
    DuplicateSaveVariable(String),

    #[error("Consider adding a description")]
    MissingDescription,

    #[error("Curl command block outside of any request ignored")]
    OrphanCommandBlock,

    #[error("Code block is not terminated")]
    UnterminatedBlock,
}

impl MetadataWarning {
    pub fn code(&self) -> &'static str {
        match self {
            MetadataWarning::UnrecognizedField(_) => "unrecognized-field",
            MetadataWarning::MalformedRequires(_) => "malformed-requires",
            MetadataWarning::InvalidSaveVariable(_) => "invalid-save-variable",
            MetadataWarning::DuplicateSaveVariable(_) => "duplicate-save-variable",
            MetadataWarning::MissingDescription => "missing-description",
            MetadataWarning::OrphanCommandBlock => "orphan-command-block",
            MetadataWarning::UnterminatedBlock => "unterminated-block",
        }
    }
}

/// 文档解析器的中间结果：文档树 + 全部诊断
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub document: Document,
    pub errors: Vec<Located<StructuralError>>,
    pub warnings: Vec<Located<MetadataWarning>>,
}

impl ParsedDocument {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 取出文档；存在结构错误时返回第一个
    pub fn into_document(self) -> Result<Document, Located<StructuralError>> {
        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(self.document),
        }
    }
}
