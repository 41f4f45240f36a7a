//! 外部 AI CLI 对接
//!
//! claude / codex / gemini 的 CLI 以子进程方式调用，
//! 从输出中提取 JSON 作为分类提示。失败时由调用方降级为“无提示”。

use crate::error::{RenamerError, Result};
use clap::ValueEnum;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sfx_renamer_common::{build_ai_classification_prompt, parse_ai_hint, AiHint, TermCatalogue};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

lazy_static! {
    /// 终端颜色控制序列
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid ansi pattern");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Claude,
    Codex,
    Gemini,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
        }
    }

    /// 非交互模式的参数
    pub fn prompt_args(&self, prompt: &str) -> Vec<String> {
        match self {
            AiProvider::Claude => vec![
                "-p".into(),
                prompt.into(),
                "--output-format".into(),
                "text".into(),
            ],
            AiProvider::Codex => vec!["exec".into(), prompt.into()],
            AiProvider::Gemini => vec!["-p".into(), prompt.into()],
        }
    }
}

/// 分类提示提供者
pub trait AiHintProvider: Send + Sync {
    fn name(&self) -> &str;

    /// 文件名（不含扩展名）和译文 → 分类提示
    fn suggest<'a>(
        &'a self,
        filename: &'a str,
        translated: Option<&'a str>,
        catalogue: &'a TermCatalogue,
    ) -> BoxFuture<'a, Result<AiHint>>;
}

/// CLI 子进程方式的提示提供者
#[derive(Debug, Clone)]
pub struct CliAiProvider {
    provider: AiProvider,
    timeout: Duration,
}

impl CliAiProvider {
    pub fn new(provider: AiProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    async fn run_cli(&self, prompt: &str) -> Result<String> {
        let name = self.provider.command_name();
        let args = self.provider.prompt_args(prompt);

        // Windows 下经由 cmd /c
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(name).args(&args);
            c
        };

        #[cfg(not(windows))]
        let mut command = {
            let mut c = Command::new(name);
            c.args(&args);
            c
        };

        command.kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                RenamerError::CliExecution(format!("{} CLI 超时 ({:?})", name, self.timeout))
            })?
            .map_err(|e| RenamerError::CliExecution(format!("{} CLI 启动失败: {}", name, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenamerError::ApiCall(format!(
                "{} CLI failed (code {:?}): {}",
                name,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        let preview: String = response.chars().take(200).collect();
        debug!(provider = name, len = response.len(), preview = %preview, "AI 响应");
        Ok(response)
    }
}

impl AiHintProvider for CliAiProvider {
    fn name(&self) -> &str {
        self.provider.command_name()
    }

    fn suggest<'a>(
        &'a self,
        filename: &'a str,
        translated: Option<&'a str>,
        catalogue: &'a TermCatalogue,
    ) -> BoxFuture<'a, Result<AiHint>> {
        Box::pin(async move {
            let prompt = build_ai_classification_prompt(filename, translated, catalogue);
            let response = self.run_cli(&prompt).await?;
            let hint = parse_ai_hint(&response)?;
            Ok(hint)
        })
    }
}

/// 去除终端控制序列
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(AiProvider::Claude.command_name(), "claude");
        assert_eq!(AiProvider::Codex.command_name(), "codex");
        assert_eq!(AiProvider::Gemini.command_name(), "gemini");
    }

    #[test]
    fn test_prompt_args() {
        let args = AiProvider::Claude.prompt_args("hello");
        assert_eq!(args, vec!["-p", "hello", "--output-format", "text"]);
        assert_eq!(AiProvider::Codex.prompt_args("x")[0], "exec");
        assert_eq!(AiProvider::Gemini.prompt_args("x"), vec!["-p", "x"]);
    }

    #[test]
    fn test_provider_serde() {
        let json = serde_json::to_string(&AiProvider::Gemini).unwrap();
        assert_eq!(json, "\"gemini\"");
        let parsed: AiProvider = serde_json::from_str("\"codex\"").unwrap();
        assert_eq!(parsed, AiProvider::Codex);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[32m{\"catId\":\"A\"}\x1b[0m"), "{\"catId\":\"A\"}");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
