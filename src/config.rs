use crate::collection::ConvertOptions;
use crate::error::{MdpostError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认输出文件后缀
pub const DEFAULT_SUFFIX: &str = ".postman_collection.json";

/// mdpost.toml 配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// [collection] 段
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CollectionConfig {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// [output] 段
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            suffix: default_suffix(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl Config {
    /// 合并 CLI 参数：CLI > 配置文件 > 默认值
    ///
    /// 名称最后回退到输入文件名（不含扩展名）。
    pub fn convert_options(
        &self,
        cli_name: Option<&str>,
        cli_description: Option<&str>,
        input: Option<&Path>,
        postman_id: Option<String>,
    ) -> ConvertOptions {
        let defaults = ConvertOptions::default();
        let stem = input
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned());
        ConvertOptions {
            name: cli_name
                .map(str::to_string)
                .or_else(|| self.collection.name.clone())
                .or(stem)
                .unwrap_or(defaults.name),
            description: cli_description
                .map(str::to_string)
                .or_else(|| self.collection.description.clone())
                .unwrap_or(defaults.description),
            postman_id,
        }
    }

    /// 默认输出路径：与输入同目录，`<stem><suffix>`
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string());
        input.with_file_name(format!("{}{}", stem, self.output.suffix))
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "mdpost.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MdpostError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            MdpostError::Config(format!("无法解析配置文件 {}: {}", path.display(), e))
        })
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录
    /// 2. 用户配置目录 ~/.config/mdpost/
    ///
    /// 找到但无法解析时返回错误。
    pub fn find_and_load() -> Result<Option<Config>> {
        match Self::find() {
            Some(path) => {
                tracing::debug!("使用配置文件: {}", path.display());
                Self::load_from_path(path).map(Some)
            }
            None => Ok(None),
        }
    }

    fn find() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_upwards(&dir))
            .or_else(Self::user_config_path)
    }

    /// 从指定目录向上查找
    pub fn find_upwards(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("mdpost").join(Self::CONFIG_FILE);
        config_path.exists().then_some(config_path)
    }
}
