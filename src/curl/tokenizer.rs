use crate::curl::types::CommandParseError;

/// 将续行符（行尾反斜杠）合并为单个逻辑命令，其余换行保留
pub fn normalize_continuations(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for line in input.lines() {
        match line.trim_end().strip_suffix('\\') {
            Some(head) => {
                output.push_str(head);
                output.push(' ');
            }
            None => {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    output
}

/// 按空白切分命令，遵循单引号和双引号规则
///
/// - 单引号内所有字符按字面保留
/// - 双引号内 `\"` `\\` `\$` `` \` `` 为转义，其他反斜杠保留
/// - 引号外反斜杠转义下一个字符
pub fn tokenize(input: &str) -> Result<Vec<String>, CommandParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // 区分空字符串参数（''）和无 token
    let mut has_token = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                has_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(CommandParseError::UnbalancedQuotes),
                    }
                }
            }
            '"' => {
                has_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.peek() {
                            Some(&next @ ('"' | '\\' | '$' | '`')) => {
                                current.push(next);
                                chars.next();
                            }
                            Some(_) => current.push('\\'),
                            None => return Err(CommandParseError::UnbalancedQuotes),
                        },
                        Some(c) => current.push(c),
                        None => return Err(CommandParseError::UnbalancedQuotes),
                    }
                }
            }
            '\\' => {
                has_token = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                has_token = true;
                current.push(c);
            }
        }
    }

    if has_token {
        tokens.push(current);
    }

    Ok(tokens)
}
