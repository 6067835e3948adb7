use regex::{CaptureMatches, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

/// 占位符检测器：扫描文本中的 {{variable}}
pub struct VariableDetector;

impl VariableDetector {
    fn regex() -> &'static Regex {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        VAR_REGEX.get_or_init(|| {
            Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_.\-]*)\}\}").expect("valid placeholder regex")
        })
    }

    /// 按首次出现顺序返回去重后的变量名（惰性迭代）
    ///
    /// 紧邻额外花括号的形式（如 `{{{x}}}`、`{{a{{b}}}}`）不视为占位符。
    pub fn detect(text: &str) -> Placeholders<'_> {
        Placeholders {
            text,
            matches: Self::regex().captures_iter(text),
            seen: HashSet::new(),
        }
    }

    /// 收集为 Vec
    pub fn collect(text: &str) -> Vec<String> {
        Self::detect(text).map(str::to_string).collect()
    }

    /// 变量名是否符合占位符标识符语法
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }

    /// 文本中是否包含至少一个占位符
    pub fn contains(text: &str) -> bool {
        Self::detect(text).next().is_some()
    }
}

/// [`VariableDetector::detect`] 返回的迭代器
pub struct Placeholders<'t> {
    text: &'t str,
    matches: CaptureMatches<'static, 't>,
    seen: HashSet<&'t str>,
}

impl<'t> Iterator for Placeholders<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        for caps in self.matches.by_ref() {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();

            let before = self.text[..whole.start()].chars().next_back();
            let after = self.text[whole.end()..].chars().next();
            if before == Some('{') || after == Some('}') {
                continue;
            }

            if self.seen.insert(name) {
                return Some(name);
            }
        }
        None
    }
}
