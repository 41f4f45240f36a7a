//! sfx-renamer
//!
//! 音效文件的中英双语分类和重命名。
//! 匹配和分类的核心逻辑在 `sfx_renamer_common`，这里是配置、外部服务对接和文件处理。

pub mod ai_provider;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod nlp_service;
pub mod pipeline;
pub mod scanner;
pub mod translate;

pub use error::{RenamerError, Result};
pub use pipeline::{BatchReport, FileOutcome, FilePipeline, PipelineOptions, Status};
