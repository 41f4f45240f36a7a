use crate::ai_provider::AiProvider;
use crate::error::{RenamerError, Result};
use serde::{Deserialize, Serialize};
use sfx_renamer_common::{build_tables, CategoryTables, Settings};
use std::path::{Path, PathBuf};

/// 翻译方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    /// 词表内的中英对照
    #[default]
    Catalogue,
    /// 不翻译
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 匹配、分类和命名设置
    pub settings: Settings,
    /// 词表文件（csv / json / xlsx）
    pub catalogue_path: Option<PathBuf>,
    /// 分类名查找表预设
    pub lookup_preset: Option<String>,
    /// 追加的查找表 JSON
    pub lookup_tables_path: Option<PathBuf>,
    pub translator: TranslatorKind,
    /// None 时不调用 AI
    pub ai_provider: Option<AiProvider>,
    pub ai_timeout_seconds: u64,
    /// 外部词性服务（未设置时只用本地分析）
    pub nlp_service_url: Option<String>,
    pub nlp_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            catalogue_path: None,
            lookup_preset: Some("ucs".into()),
            lookup_tables_path: None,
            translator: TranslatorKind::Catalogue,
            ai_provider: None,
            ai_timeout_seconds: 120,
            nlp_service_url: None,
            nlp_timeout_seconds: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 文件不存在时返回默认值
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RenamerError::Config("找不到用户主目录".into()))?;
        Ok(home.join(".config").join("sfx-renamer").join("config.json"))
    }

    /// 命令行参数优先，其次是配置文件
    pub fn resolve_catalogue(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(|| self.catalogue_path.clone())
            .ok_or(RenamerError::MissingCatalogue)?;
        if !path.exists() {
            return Err(RenamerError::FileNotFound(path.display().to_string()));
        }
        Ok(path)
    }

    pub fn set_catalogue(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(RenamerError::FileNotFound(path.display().to_string()));
        }
        self.catalogue_path = Some(path);
        self.save()
    }

    /// 预设 + 追加 JSON 合成查找表
    pub fn category_tables(&self) -> Result<CategoryTables> {
        let custom = match &self.lookup_tables_path {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };
        let tables = build_tables(self.lookup_preset.as_deref(), custom.as_deref())?;
        Ok(tables)
    }
}
