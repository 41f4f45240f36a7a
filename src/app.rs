//! 配置 → 流水线组装
//!
//! 词表、分词器（含外部词性服务）、翻译、AI 提供者都在这里显式构建并注入。

use crate::ai_provider::CliAiProvider;
use crate::config::{Config, TranslatorKind};
use crate::error::Result;
use crate::nlp_service::HttpPosProvider;
use crate::pipeline::FilePipeline;
use crate::translate::{CatalogueTranslator, PassthroughTranslator, Translator};
use sfx_renamer_common::{TermCatalogue, Tokenizer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 词表读取
pub fn load_catalogue(path: &Path) -> Result<Arc<TermCatalogue>> {
    let catalogue = TermCatalogue::from_path(path)?;
    info!(path = %path.display(), terms = catalogue.len(), "词表已读取");
    Ok(Arc::new(catalogue))
}

/// 分词器（外部词性服务优先，本地分析兜底）
pub fn build_tokenizer(config: &Config) -> Tokenizer {
    let mut tokenizer = Tokenizer::new(config.settings.tokenizer.clone());

    let url = config.nlp_service_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    if let Some(url) = url {
        match HttpPosProvider::new(
            url,
            Duration::from_secs(config.nlp_timeout_seconds),
            config.settings.tokenizer.pos_weights.clone(),
        ) {
            Ok(provider) => tokenizer = tokenizer.with_provider(Arc::new(provider)),
            Err(e) => warn!(url, error = %e, "词性服务不可用，只使用本地分析"),
        }
    }
    tokenizer
}

pub fn build_translator(config: &Config, catalogue: &TermCatalogue) -> Arc<dyn Translator> {
    match config.translator {
        TranslatorKind::Catalogue => Arc::new(CatalogueTranslator::new(catalogue)),
        TranslatorKind::Passthrough => Arc::new(PassthroughTranslator),
    }
}

pub fn build_pipeline(config: &Config, catalogue: Arc<TermCatalogue>) -> Result<FilePipeline> {
    let tables = config.category_tables()?;
    let translator = build_translator(config, &catalogue);
    let tokenizer = build_tokenizer(config);

    let mut pipeline = FilePipeline::with_tokenizer(&config.settings, catalogue, tables, tokenizer)
        .with_translator(translator);

    if let Some(provider) = config.ai_provider {
        let timeout = Duration::from_secs(config.ai_timeout_seconds);
        pipeline = pipeline.with_ai_provider(Arc::new(CliAiProvider::new(provider, timeout)));
    }
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tokenizer_providers() {
        let config = Config::default();
        assert!(build_tokenizer(&config).provider_names().is_empty());

        let config = Config {
            nlp_service_url: Some("http://127.0.0.1:9/pos".into()),
            ..Config::default()
        };
        assert_eq!(build_tokenizer(&config).provider_names(), vec!["http"]);

        let config = Config {
            nlp_service_url: Some("  ".into()),
            ..Config::default()
        };
        assert!(build_tokenizer(&config).provider_names().is_empty());
    }

    #[test]
    fn test_build_translator_kind() {
        let catalogue = TermCatalogue::from_csv_str("SubCategory,SubCategory_zh,CatID\nDoor,门,DOORWood\n").unwrap();
        let config = Config::default();
        assert_eq!(build_translator(&config, &catalogue).name(), "catalogue");

        let config = Config {
            translator: TranslatorKind::Passthrough,
            ..Config::default()
        };
        assert_eq!(build_translator(&config, &catalogue).name(), "passthrough");
    }
}
