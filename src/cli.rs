use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use mdpost::config::{Config, ConfigLoader};
use mdpost::utils::ReportFormatter;
use mdpost::{convert, validate_structure};
use std::fs;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown 文件路径
    pub input: PathBuf,

    /// 输出文件路径（默认 <stem>.postman_collection.json）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 集合名称
    #[arg(short, long)]
    pub name: Option<String>,

    /// 集合描述
    #[arg(short, long)]
    pub description: Option<String>,

    /// 只校验文档结构，不生成集合
    #[arg(long)]
    pub validate: bool,

    /// 以 JSON 输出校验报告（配合 --validate）
    #[arg(long, requires = "validate")]
    pub json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 指定配置文件（默认查找 mdpost.toml）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 将集合 JSON 写到标准输出
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// 执行命令；返回 false 表示校验未通过
pub fn run(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;
    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("无法读取文件: {}", cli.input.display()))?;

    if cli.validate {
        return validate(cli, &content);
    }

    let options = config.convert_options(
        cli.name.as_deref(),
        cli.description.as_deref(),
        Some(&cli.input),
        Some(uuid::Uuid::new_v4().to_string()),
    );
    let collection = convert(&content, &options)?;
    let json = collection.to_json(config.output.pretty)?;

    if cli.stdout {
        println!("{}", json);
        return Ok(true);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(&cli.input));
    fs::write(&output, json).with_context(|| format!("无法写入文件: {}", output.display()))?;

    println!(
        "{}",
        ReportFormatter::new().format_summary(&collection, Some(&output))
    );
    Ok(true)
}

fn validate(cli: &Cli, content: &str) -> Result<bool> {
    let report = validate_structure(content);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}\n",
            "Validating".cyan().bold(),
            cli.input.display()
        );
        println!("{}", ReportFormatter::new().format_report(&report));
    }

    Ok(report.is_valid)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => ConfigLoader::find_and_load()?.unwrap_or_default(),
    };
    Ok(config)
}
