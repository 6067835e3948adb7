use serde::{Deserialize, Serialize};

/// Postman Collection v2.1 schema 地址
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// 完整的集合文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: Info,
    pub item: Vec<Item>,
    #[serde(default)]
    pub variable: Vec<Variable>,
}

impl Collection {
    /// 序列化为 JSON 字符串
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// 按文档顺序遍历所有请求项
    pub fn requests(&self) -> Vec<&RequestItem> {
        fn walk<'a>(items: &'a [Item], out: &mut Vec<&'a RequestItem>) {
            for item in items {
                match item {
                    Item::Folder(folder) => walk(&folder.item, out),
                    Item::Request(request) => out.push(request),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.item, &mut out);
        out
    }

    pub fn folders(&self) -> impl Iterator<Item = &FolderItem> {
        self.item.iter().filter_map(|item| match item {
            Item::Folder(folder) => Some(folder),
            Item::Request(_) => None,
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    pub description: String,
    pub schema: String,
    #[serde(rename = "_postman_id", default, skip_serializing_if = "Option::is_none")]
    pub postman_id: Option<String>,
}

/// 顶层或目录中的条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Folder(FolderItem),
    Request(RequestItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderItem {
    pub name: String,
    pub item: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub request: Request,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<Event>,
}

impl RequestItem {
    /// 查找指定监听类型的脚本
    pub fn script(&self, listen: &str) -> Option<&Script> {
        self.event
            .iter()
            .find(|e| e.listen == listen)
            .map(|e| &e.script)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Header {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mode: String,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BodyOptions>,
}

impl Body {
    pub fn raw_json(raw: impl Into<String>) -> Self {
        Self {
            mode: "raw".to_string(),
            raw: raw.into(),
            options: Some(BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            }),
        }
    }

    pub fn raw_text(raw: impl Into<String>) -> Self {
        Self {
            mode: "raw".to_string(),
            raw: raw.into(),
            options: None,
        }
    }

    pub fn is_json(&self) -> bool {
        self.options
            .as_ref()
            .map(|o| o.raw.language == "json")
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOptions {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Url {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    pub host: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub path: Vec<String>,
    #[serde(default)]
    pub query: Vec<QueryParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub listen: String,
    pub script: Script,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "type")]
    pub kind: String,
    pub exec: Vec<String>,
}

impl Script {
    pub fn javascript(exec: Vec<String>) -> Self {
        Self {
            kind: "text/javascript".to_string(),
            exec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Variable {
    /// 初始值为空的字符串变量
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
            kind: "string".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_serializes_type() {
        let json = serde_json::to_value(Header::text("Accept", "application/json")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "Accept", "value": "application/json", "type": "text"})
        );
    }

    #[test]
    fn test_body_options_only_for_json() {
        let json = serde_json::to_value(Body::raw_text("a=1")).unwrap();
        assert!(json.get("options").is_none());

        let json = serde_json::to_value(Body::raw_json("{}")).unwrap();
        assert_eq!(json["options"]["raw"]["language"], "json");
    }

    #[test]
    fn test_item_untagged_roundtrip() {
        let json = serde_json::json!([
            {"name": "Folder", "item": []},
            {
                "name": "Req",
                "request": {
                    "method": "GET",
                    "header": [],
                    "url": {"raw": "https://x.io", "host": ["x", "io"], "path": []}
                }
            }
        ]);
        let items: Vec<Item> = serde_json::from_value(json).unwrap();
        assert!(matches!(items[0], Item::Folder(_)));
        assert!(matches!(items[1], Item::Request(_)));
    }
}
