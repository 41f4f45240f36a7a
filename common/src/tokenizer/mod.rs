//! 分词 + 词性标注
//!
//! ## 处理流程
//! 1. 按 CJK / 非 CJK 切分片段，英文走启发式标注，中文走 jieba
//! 2. 按词性赋权重
//! 3. 过滤数字、标点、虚词
//! 4. 去重（先出现者保留）
//!
//! 外部词性服务以 `PosProvider` 注册，按优先级依次尝试；
//! 全部失败时回退到本地分析，不向调用方报错。

pub mod cache;
pub mod chinese;
pub mod english;

use crate::error::Result;
use crate::settings::TokenizerSettings;
use crate::text::{is_number, is_punctuation, is_stopword, split_script_runs, ScriptRun};
use crate::types::{Pos, WordInfo, WordSource};
use cache::PosCache;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// 词性分析能力
pub trait PosProvider: Send + Sync {
    fn name(&self) -> &str;

    /// 分析文本；失败或不可用时返回 Err
    fn try_analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<WordInfo>>>;
}

/// 本地分析（英文启发式 + 中文词典分词），不会失败
#[derive(Debug, Clone, Default)]
pub struct LocalProvider {
    settings: TokenizerSettings,
}

impl LocalProvider {
    pub fn new(settings: TokenizerSettings) -> Self {
        Self { settings }
    }

    /// 同步分析（权重按词性默认值）
    pub fn analyze(&self, text: &str) -> Vec<WordInfo> {
        let weights = &self.settings.pos_weights;
        let mut words = Vec::new();

        for run in split_script_runs(text) {
            let tagged = match run {
                ScriptRun::Cjk(s) => chinese::tag(s, self.settings.chinese_segmenter),
                ScriptRun::Other(s) => english::tag(s),
            };
            words.extend(
                tagged
                    .into_iter()
                    .map(|(w, pos)| WordInfo::new(w, pos, weights.weight_for(pos))),
            );
        }

        words
    }
}

impl PosProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn try_analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<WordInfo>>> {
        Box::pin(async move { Ok(self.analyze(text)) })
    }
}

/// 分词器
///
/// 调用之间除缓存外不保留状态。
pub struct Tokenizer {
    settings: TokenizerSettings,
    local: LocalProvider,
    /// 外部服务（按优先级）
    providers: Vec<Arc<dyn PosProvider>>,
    cache: Mutex<PosCache>,
}

impl Tokenizer {
    pub fn new(settings: TokenizerSettings) -> Self {
        Self {
            local: LocalProvider::new(settings.clone()),
            cache: Mutex::new(PosCache::new(settings.cache_capacity)),
            providers: Vec::new(),
            settings,
        }
    }

    /// 追加外部服务（先加入的优先）
    pub fn with_provider(mut self, provider: Arc<dyn PosProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn settings(&self) -> &TokenizerSettings {
        &self.settings
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.local.name()))
            .collect()
    }

    /// 本地同步分析（带缓存）
    pub fn analyze(&self, text: &str) -> Vec<WordInfo> {
        self.analyze_as(text, WordSource::Original)
    }

    /// 本地同步分析并标记来源
    pub fn analyze_as(&self, text: &str, source: WordSource) -> Vec<WordInfo> {
        let normalized = normalize_input(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        if let Some(cached) = self.cached(&normalized) {
            return mark_source(cached, source);
        }

        let words = self.post_process(self.local.analyze(&normalized));
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(normalized, words.clone());
        }
        mark_source(words, source)
    }

    /// 外部服务优先的分析；全部失败时回退到本地
    pub async fn analyze_with_providers(&self, text: &str, source: WordSource) -> Vec<WordInfo> {
        let normalized = normalize_input(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        for provider in &self.providers {
            match provider.try_analyze(&normalized).await {
                Ok(words) if !words.is_empty() => {
                    debug!(provider = provider.name(), count = words.len(), "外部词性分析成功");
                    return mark_source(self.post_process(words), source);
                }
                Ok(_) => debug!(provider = provider.name(), "外部词性分析结果为空，尝试下一个"),
                Err(e) => warn!(provider = provider.name(), error = %e, "外部词性分析失败，尝试下一个"),
            }
        }

        self.analyze_as(&normalized, source)
    }

    /// 不做词性区分的简单切分（所有词为 Other，权重 1.0）
    pub fn simple_tokens(&self, text: &str, source: WordSource) -> Vec<WordInfo> {
        let normalized = normalize_input(text);
        let mut seen = HashSet::new();
        normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .filter(|w| seen.insert(w.clone()))
            .map(|w| WordInfo::new(w, Pos::Other, 1.0).with_source(source))
            .collect()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn cached(&self, text: &str) -> Option<Vec<WordInfo>> {
        self.cache.lock().ok().and_then(|c| c.get(text).cloned())
    }

    /// 权重补全 → 过滤 → 去重
    fn post_process(&self, words: Vec<WordInfo>) -> Vec<WordInfo> {
        let weights = &self.settings.pos_weights;
        let filter = &self.settings.post_filter;
        let mut seen = HashSet::new();

        words
            .into_iter()
            .map(|mut w| {
                w.word = w.word.trim().to_string();
                if w.weight <= 0.0 || !w.weight.is_finite() {
                    w.weight = weights.weight_for(w.pos);
                }
                w
            })
            .filter(|w| !w.word.is_empty())
            .filter(|w| {
                if !filter.enabled {
                    return true;
                }
                if is_number(&w.word) && w.weight < filter.number_weight_threshold {
                    return false;
                }
                if is_punctuation(&w.word) && w.weight < filter.punctuation_weight_threshold {
                    return false;
                }
                !(filter.remove_function_words && is_stopword(&w.word))
            })
            .filter(|w| seen.insert(w.word.to_lowercase()))
            .collect()
    }
}

/// 下划线视为空格
fn normalize_input(text: &str) -> String {
    text.replace('_', " ").trim().to_string()
}

fn mark_source(words: Vec<WordInfo>, source: WordSource) -> Vec<WordInfo> {
    words.into_iter().map(|w| w.with_source(source)).collect()
}
