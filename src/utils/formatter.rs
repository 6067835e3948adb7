use crate::collection::Collection;
use crate::parser::{Diagnostic, ValidationReport};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use std::path::Path;

/// 终端输出格式化：校验报告与转换摘要
pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// 校验报告：状态行、错误、警告、请求表
    pub fn format_report(&self, report: &ValidationReport) -> String {
        let mut output = Vec::new();

        let status = if report.is_valid {
            self.paint("✓ Document structure is valid", |s| s.green().bold())
        } else {
            self.paint("✗ Document structure is invalid", |s| s.red().bold())
        };
        output.push(status);

        if !report.errors.is_empty() {
            output.push(String::new());
            output.push(self.paint(&format!("Errors ({}):", report.errors.len()), |s| {
                s.red().bold()
            }));
            for error in &report.errors {
                output.push(self.diagnostic_line(error, "✗", true));
            }
        }

        if !report.warnings.is_empty() {
            output.push(String::new());
            output.push(
                self.paint(&format!("Warnings ({}):", report.warnings.len()), |s| {
                    s.yellow().bold()
                }),
            );
            for warning in &report.warnings {
                output.push(self.diagnostic_line(warning, "!", false));
            }
        }

        if !report.requests.is_empty() {
            output.push(String::new());
            output.push(self.requests_table(report).to_string());
        }

        output.push(String::new());
        output.push(format!(
            "{} requests, {} folders, {} errors, {} warnings",
            report.requests.len(),
            report.folder_names().len(),
            report.errors.len(),
            report.warnings.len()
        ));

        output.join("\n")
    }

    /// 转换成功后的摘要
    pub fn format_summary(&self, collection: &Collection, output: Option<&Path>) -> String {
        let mut lines = Vec::new();
        let title = format!("✓ Generated collection '{}'", collection.info.name);
        lines.push(self.paint(&title, |s| s.green().bold()));

        if let Some(path) = output {
            lines.push(format!("  Output:    {}", path.display()));
        }
        lines.push(format!("  Requests:  {}", collection.request_count()));
        lines.push(format!("  Folders:   {}", collection.folder_count()));
        lines.push(format!("  Variables: {}", collection.variable.len()));

        if !collection.variable.is_empty() {
            let names: Vec<&str> = collection.variable.iter().map(|v| v.key.as_str()).collect();
            lines.push(format!(
                "  {}",
                self.paint(&names.join(", "), |s| s.dimmed())
            ));
        }

        lines.join("\n")
    }

    fn diagnostic_line(&self, diagnostic: &Diagnostic, symbol: &str, is_error: bool) -> String {
        let symbol = if is_error {
            self.paint(symbol, |s| s.red())
        } else {
            self.paint(symbol, |s| s.yellow())
        };
        format!(
            "  {} [{}] {}: {}",
            symbol,
            diagnostic.code,
            diagnostic.location,
            diagnostic.message
        )
    }

    fn requests_table(&self, report: &ValidationReport) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Line", "Folder", "Request", "Command", "Requires", "Saves", "Variables",
        ]);

        for summary in &report.requests {
            let command = if summary.has_command {
                self.cell("yes", Color::Green)
            } else {
                self.cell("missing", Color::Red)
            };

            let mut folder = Cell::new(summary.folder.as_deref().unwrap_or("-"));
            if self.color {
                folder = folder.add_attribute(Attribute::Dim);
            }

            table.add_row(vec![
                Cell::new(summary.line),
                folder,
                Cell::new(&summary.name),
                command,
                Cell::new(summary.requires.join(", ")),
                Cell::new(summary.save_response_variable.as_deref().unwrap_or("")),
                Cell::new(summary.variables_used.join(", ")),
            ]);
        }

        table
    }

    fn cell(&self, text: &str, color: Color) -> Cell {
        let cell = Cell::new(text);
        if self.color { cell.fg(color) } else { cell }
    }

    fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: Fn(&str) -> ColoredString,
    {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
