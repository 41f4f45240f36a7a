use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenamerError {
    #[error("{0}")]
    Common(#[from] sfx_renamer_common::Error),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("未设置词表文件。请用 `sfx-renamer config --set-catalogue PATH` 设置")]
    MissingCatalogue,

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件夹不存在: {0}")]
    FolderNotFound(String),

    #[error("没有找到音效文件: {0}")]
    NoAudioFiles(String),

    #[error("API 调用错误: {0}")]
    ApiCall(String),

    #[error("CLI 执行错误: {0}")]
    CliExecution(String),

    #[error("重命名失败: {0}")]
    Rename(String),

    #[error("JSON 解析错误: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenamerError>;
