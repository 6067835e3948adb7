use crate::variable::detector::VariableDetector;
use std::collections::HashSet;

/// 全局变量登记表：保持首次出现顺序并去重
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记单个变量名，返回是否为新变量
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string());
        self.names.push(name.to_string());
        true
    }

    /// 扫描文本并登记其中所有占位符
    pub fn scan(&mut self, text: &str) {
        for name in VariableDetector::detect(text) {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}
