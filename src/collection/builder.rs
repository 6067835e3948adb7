use crate::collection::script::{self, PREREQUEST, TEST};
use crate::collection::types::{
    Body, Collection, Event, FolderItem, Header, Info, Item, Request, RequestItem, SCHEMA_URL,
    Script, Variable,
};
use crate::collection::url::build_url;
use crate::curl::{CommandBody, CommandParser};
use crate::error::{MdpostError, Result};
use crate::parser::{Document, Location, RawRequest, StructuralError};
use crate::variable::VariableRegistry;
use tracing::{debug, info};

pub const DEFAULT_NAME: &str = "Generated Collection";
pub const DEFAULT_DESCRIPTION: &str = "Collection generated from Markdown";

/// 转换选项
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub name: String,
    pub description: String,
    /// 集合 ID，由调用方提供（CLI 生成 uuid v4）
    pub postman_id: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            postman_id: None,
        }
    }
}

/// 从文档模型构建集合
pub struct CollectionBuilder<'a> {
    options: &'a ConvertOptions,
    registry: VariableRegistry,
}

impl<'a> CollectionBuilder<'a> {
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            registry: VariableRegistry::new(),
        }
    }

    /// 构建集合：根目录请求放在顶层，空目录省略
    ///
    /// 第一个无法解析的命令会终止构建。
    pub fn build(mut self, document: &Document) -> Result<Collection> {
        let mut items = Vec::new();

        for folder in &document.folders {
            if folder.requests.is_empty() {
                continue;
            }

            let mut requests = Vec::with_capacity(folder.requests.len());
            for request in &folder.requests {
                let item = self.build_request(folder.name.as_deref(), request)?;
                requests.push(Item::Request(item));
            }

            match &folder.name {
                None => items.extend(requests),
                Some(name) => items.push(Item::Folder(FolderItem {
                    name: name.clone(),
                    item: requests,
                })),
            }
        }

        let variable: Vec<Variable> = self
            .registry
            .into_names()
            .into_iter()
            .map(Variable::empty)
            .collect();

        let collection = Collection {
            info: Info {
                name: self.options.name.clone(),
                description: self.options.description.clone(),
                schema: SCHEMA_URL.to_string(),
                postman_id: self.options.postman_id.clone(),
            },
            item: items,
            variable,
        };

        info!(
            "已构建集合 '{}': {} 个请求, {} 个目录, {} 个变量",
            collection.info.name,
            collection.request_count(),
            collection.folder_count(),
            collection.variable.len()
        );

        Ok(collection)
    }

    fn build_request(&mut self, folder: Option<&str>, request: &RawRequest) -> Result<RequestItem> {
        let location = Location::of_request(folder, request);

        let command_text = request
            .command
            .as_deref()
            .ok_or_else(|| MdpostError::Structural {
                source: StructuralError::MissingCommand,
                location: location.clone(),
            })?;

        let command = CommandParser::parse(command_text).map_err(|source| MdpostError::Command {
            source,
            location: location.clone(),
        })?;

        debug!(
            "请求 {}: {} {}",
            request.display_name(),
            command.method,
            command.raw_url
        );

        // 变量按 URL、header、body 的顺序登记
        self.registry.scan(&command.raw_url);
        for (name, value) in &command.headers {
            self.registry.scan(name);
            self.registry.scan(value);
        }

        let body = match &command.body {
            Some(body @ CommandBody::Json(_)) => {
                let raw = body.render();
                self.registry.scan(&raw);
                Some(Body::raw_json(raw))
            }
            Some(body @ CommandBody::Raw(_)) => {
                let raw = body.render();
                self.registry.scan(&raw);
                Some(Body::raw_text(raw))
            }
            None => None,
        };

        let mut event = Vec::new();
        let metadata = &request.metadata;
        if !metadata.requires.is_empty() {
            event.push(Event {
                listen: PREREQUEST.to_string(),
                script: Script::javascript(script::prerequest_script(&metadata.requires)),
            });
        }
        if let Some(variable) = &metadata.save_response_variable {
            event.push(Event {
                listen: TEST.to_string(),
                script: Script::javascript(script::test_script(variable)),
            });
        }

        Ok(RequestItem {
            name: request.name.clone(),
            request: Request {
                method: command.method.as_str().to_string(),
                header: command
                    .headers
                    .iter()
                    .map(|(name, value)| Header::text(name, value))
                    .collect(),
                body,
                url: build_url(&command),
                description: metadata.description.clone(),
            },
            event,
        })
    }
}
