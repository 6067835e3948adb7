pub mod parser;
pub mod tokenizer;
pub mod types;

// Re-export commonly used types
pub use parser::CommandParser;
pub use types::{CommandBody, CommandParseError, HttpMethod, ParsedCommand};

/// 解析单条 cURL 命令
pub fn parse_command(command: &str) -> Result<ParsedCommand, CommandParseError> {
    CommandParser::parse(command)
}
