use crate::ai_provider::AiProvider;
use clap::{Parser, Subcommand, ValueEnum};
use sfx_renamer_common::EngineKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sfx-renamer")]
#[command(about = "音效文件中英双语分类和重命名工具", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 词表文件（覆盖配置文件中的设置）
    #[arg(short, long, global = true)]
    pub catalogue: Option<PathBuf>,

    /// AI 提供者（不指定时使用配置文件中的设置）
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,

    /// 匹配引擎
    #[arg(long, global = true)]
    pub engine: Option<EngineArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Token,
    Fuzzy,
}

impl From<EngineArg> for EngineKind {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Token => EngineKind::Token,
            EngineArg::Fuzzy => EngineKind::Fuzzy,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 对一段文本（文件名）进行分类
    Classify {
        /// 文件名或描述
        #[arg(required = true)]
        text: String,

        /// 译文
        #[arg(short, long)]
        translated: Option<String>,

        /// AI 提示 JSON（例: '{"catId": "DOORWood"}'）
        #[arg(long)]
        ai_hint: Option<String>,

        /// 显示全部候选
        #[arg(short, long)]
        all: bool,
    },

    /// 对文件夹内的音效文件分类并重命名
    Rename {
        /// 音效文件夹
        #[arg(required = true)]
        folder: PathBuf,

        /// 只显示结果，不改文件
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// 包含子文件夹
        #[arg(short, long)]
        recursive: bool,

        /// 结果报告 JSON 的输出路径
        #[arg(long)]
        report: Option<PathBuf>,

        /// 逐个文件从候选中选择分类
        #[arg(short, long)]
        interactive: bool,

        /// 起始编号
        #[arg(long, default_value = "1")]
        start_serial: u32,
    },

    /// 词表内容确认
    Catalogue {
        /// 词表文件（csv / json / xlsx）
        #[arg(required = true)]
        path: PathBuf,

        /// 显示分类一览
        #[arg(long)]
        categories: bool,
    },

    /// 设置管理
    Config {
        /// 显示当前设置
        #[arg(long)]
        show: bool,

        /// 设置默认词表文件
        #[arg(long)]
        set_catalogue: Option<PathBuf>,

        /// 设置 AI 提供者
        #[arg(long)]
        set_ai_provider: Option<AiProvider>,

        /// 设置外部词性服务 URL（空字符串为关闭）
        #[arg(long)]
        set_nlp_url: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rename() {
        let cli = Cli::try_parse_from([
            "sfx-renamer",
            "rename",
            "./sfx",
            "--dry-run",
            "-r",
            "--report",
            "out.json",
            "--engine",
            "fuzzy",
        ])
        .unwrap();
        assert_eq!(cli.engine, Some(EngineArg::Fuzzy));
        match cli.command {
            Commands::Rename {
                folder,
                dry_run,
                recursive,
                report,
                interactive,
                start_serial,
            } => {
                assert_eq!(folder, PathBuf::from("./sfx"));
                assert!(dry_run);
                assert!(recursive);
                assert_eq!(report, Some(PathBuf::from("out.json")));
                assert!(!interactive);
                assert_eq!(start_serial, 1);
            }
            _ => panic!("不是 rename 命令"),
        }
    }

    #[test]
    fn test_parse_classify_with_global_flags() {
        let cli = Cli::try_parse_from([
            "sfx-renamer",
            "classify",
            "轻轻的脚步声",
            "-t",
            "soft footsteps",
            "--ai-provider",
            "codex",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.ai_provider, Some(AiProvider::Codex));
        match cli.command {
            Commands::Classify { text, translated, all, .. } => {
                assert_eq!(text, "轻轻的脚步声");
                assert_eq!(translated.as_deref(), Some("soft footsteps"));
                assert!(!all);
            }
            _ => panic!("不是 classify 命令"),
        }
    }

    #[test]
    fn test_engine_conversion() {
        assert_eq!(EngineKind::from(EngineArg::Token), EngineKind::Token);
        assert_eq!(EngineKind::from(EngineArg::Fuzzy), EngineKind::Fuzzy);
    }
}
