//! 分类调度
//!
//! 按设置中的策略顺序依次尝试，第一个成功的策略决定结果：
//!
//! 1. AI 提示（catID 必须存在于词表）
//! 2. 双语匹配（有译文时）
//! 3. 原文 POS 加权匹配
//! 4. 译文 POS 加权匹配
//! 5. 原文简单切分匹配（不加权）
//! 6. 首段启发式（空格前的部分，阈值降低）
//!
//! 全部失败时返回 None，由调用方归入默认分类。

use crate::catalogue::TermCatalogue;
use crate::matcher::{MatchOptions, Matcher};
use crate::settings::{ClassifierSettings, Strategy};
use crate::text::contains_cjk;
use crate::tokenizer::Tokenizer;
use crate::types::{AiHint, MatchResult, TermRecord, WordInfo, WordSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// 分类输入
#[derive(Debug, Clone, Default)]
pub struct ClassifyInput {
    /// 原文（通常为去掉扩展名的文件名）
    pub text: String,
    /// 译文
    pub translated: Option<String>,
    /// 已有的原文分词结果（省略时由分词器生成）
    pub original_words: Option<Vec<WordInfo>>,
    pub translated_words: Option<Vec<WordInfo>>,
    pub ai_hint: Option<AiHint>,
}

impl ClassifyInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_translated(mut self, translated: impl Into<String>) -> Self {
        let translated = translated.into();
        if !translated.trim().is_empty() {
            self.translated = Some(translated);
        }
        self
    }

    pub fn with_original_words(mut self, words: Vec<WordInfo>) -> Self {
        self.original_words = Some(words);
        self
    }

    pub fn with_translated_words(mut self, words: Vec<WordInfo>) -> Self {
        self.translated_words = Some(words);
        self
    }

    pub fn with_ai_hint(mut self, hint: AiHint) -> Self {
        self.ai_hint = Some(hint);
        self
    }
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub cat_id: String,
    pub term: TermRecord,
    pub score: f64,
    pub strategy: Strategy,
    pub match_type: String,
    /// 候选（含第一名，按得分降序）
    pub alternatives: Vec<MatchResult>,
}

impl ClassificationResult {
    fn from_matches(strategy: Strategy, matches: Vec<MatchResult>) -> Option<Self> {
        let best = matches.first()?.clone();
        Some(Self {
            cat_id: best.cat_id,
            term: best.term,
            score: best.score,
            strategy,
            match_type: best.match_type,
            alternatives: matches,
        })
    }
}

/// 分类器
///
/// 分词器和匹配引擎由调用方注入，分类器本身无可变状态。
pub struct Classifier {
    tokenizer: Arc<Tokenizer>,
    matcher: Arc<dyn Matcher>,
    settings: ClassifierSettings,
}

impl Classifier {
    pub fn new(tokenizer: Arc<Tokenizer>, matcher: Arc<dyn Matcher>, settings: ClassifierSettings) -> Self {
        Self {
            tokenizer,
            matcher,
            settings,
        }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    pub fn catalogue(&self) -> &TermCatalogue {
        self.matcher.catalogue()
    }

    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    /// AI 提示校验：catID 不在词表中则丢弃
    pub fn validate_ai_hint(&self, hint: &AiHint) -> Option<&TermRecord> {
        let cat_id = hint.cat_id.trim();
        if cat_id.is_empty() {
            return None;
        }
        let term = self.catalogue().find_term_by_cat_id(cat_id);
        if term.is_none() {
            debug!(cat_id, "AI 提示的 catID 不在词表中，已忽略");
        }
        term
    }

    /// 同步分类（本地分词）
    pub fn classify(&self, input: &ClassifyInput) -> Option<ClassificationResult> {
        let original = match &input.original_words {
            Some(words) => words.clone(),
            None => self.tokenizer.analyze_as(&input.text, WordSource::Original),
        };
        let translated = match (&input.translated_words, &input.translated) {
            (Some(words), _) => words.clone(),
            (None, Some(text)) => self.tokenizer.analyze_as(text, WordSource::Translated),
            (None, None) => Vec::new(),
        };
        self.run_cascade(input, &original, &translated)
    }

    /// 外部词性服务优先的分类
    pub async fn classify_with_providers(&self, input: &ClassifyInput) -> Option<ClassificationResult> {
        let original = match &input.original_words {
            Some(words) => words.clone(),
            None => {
                self.tokenizer
                    .analyze_with_providers(&input.text, WordSource::Original)
                    .await
            }
        };
        let translated = match (&input.translated_words, &input.translated) {
            (Some(words), _) => words.clone(),
            (None, Some(text)) => {
                self.tokenizer
                    .analyze_with_providers(text, WordSource::Translated)
                    .await
            }
            (None, None) => Vec::new(),
        };
        self.run_cascade(input, &original, &translated)
    }

    /// 文件名分类（扩展名自动去除）
    pub fn classify_file(
        &self,
        filename: &str,
        ai_hint: Option<&AiHint>,
        translated: Option<&str>,
    ) -> Option<ClassificationResult> {
        let mut input = ClassifyInput::new(file_stem(filename));
        if let Some(hint) = ai_hint {
            input = input.with_ai_hint(hint.clone());
        }
        if let Some(text) = translated {
            input = input.with_translated(text);
        }
        self.classify(&input)
    }

    /// 只返回 catID
    pub fn identify_category(
        &self,
        text: &str,
        pos_analysis: Option<&[WordInfo]>,
        translated: Option<&str>,
    ) -> Option<String> {
        let mut input = ClassifyInput::new(text);
        if let Some(words) = pos_analysis {
            input = input.with_original_words(words.to_vec());
        }
        if let Some(t) = translated {
            input = input.with_translated(t);
        }
        self.classify(&input).map(|r| r.cat_id)
    }

    fn options(&self, threshold: Option<f64>) -> MatchOptions {
        MatchOptions {
            return_all: true,
            limit: Some(self.settings.alternatives_limit.max(1)),
            threshold,
            ..MatchOptions::default()
        }
    }

    fn run_cascade(
        &self,
        input: &ClassifyInput,
        original: &[WordInfo],
        translated: &[WordInfo],
    ) -> Option<ClassificationResult> {
        for strategy in &self.settings.strategies {
            let outcome = match strategy {
                Strategy::Ai => self.try_ai(input),
                Strategy::Bilingual => self.try_bilingual(original, translated),
                Strategy::PosOriginal => self.try_words(Strategy::PosOriginal, original, None),
                Strategy::PosTranslated => self.try_words(Strategy::PosTranslated, translated, None),
                Strategy::PlainOriginal => self.try_plain(Strategy::PlainOriginal, &input.text, None),
                Strategy::FirstSegment => self.try_first_segment(input),
            };

            match outcome {
                Some(result) => {
                    debug!(
                        strategy = %strategy,
                        cat_id = %result.cat_id,
                        score = result.score,
                        "分类成功"
                    );
                    return Some(result);
                }
                None => debug!(strategy = %strategy, "策略未命中"),
            }
        }
        None
    }

    fn try_ai(&self, input: &ClassifyInput) -> Option<ClassificationResult> {
        let hint = input.ai_hint.as_ref()?;
        let term = self.validate_ai_hint(hint)?;
        Some(ClassificationResult {
            cat_id: term.cat_id.clone(),
            term: term.clone(),
            score: hint.confidence.unwrap_or(1.0),
            strategy: Strategy::Ai,
            match_type: "ai".to_string(),
            alternatives: Vec::new(),
        })
    }

    fn try_bilingual(&self, original: &[WordInfo], translated: &[WordInfo]) -> Option<ClassificationResult> {
        if translated.is_empty() {
            return None;
        }
        let matches = self
            .matcher
            .get_all_bilingual_matches(original, translated, &self.options(None));
        ClassificationResult::from_matches(Strategy::Bilingual, matches)
    }

    fn try_words(
        &self,
        strategy: Strategy,
        words: &[WordInfo],
        threshold: Option<f64>,
    ) -> Option<ClassificationResult> {
        if words.is_empty() {
            return None;
        }
        let matches = self.matcher.get_all_matches(words, &self.options(threshold));
        ClassificationResult::from_matches(strategy, matches)
    }

    fn try_plain(&self, strategy: Strategy, text: &str, threshold: Option<f64>) -> Option<ClassificationResult> {
        let words = self.tokenizer.simple_tokens(text, WordSource::Original);
        if words.is_empty() {
            return None;
        }
        let options = self.options(threshold).without_pos_weighting();
        let matches = self.matcher.get_all_matches(&words, &options);
        ClassificationResult::from_matches(strategy, matches)
    }

    /// 首段（空格前）重试，阈值乘以 `first_segment_threshold_factor`
    fn try_first_segment(&self, input: &ClassifyInput) -> Option<ClassificationResult> {
        let segment = self.first_segment(&input.text)?;
        let threshold = self.matcher.default_threshold(false) * self.settings.first_segment_threshold_factor;
        debug!(segment = %segment, threshold, "首段启发式");

        let original = self.tokenizer.analyze_as(&segment, WordSource::Original);
        if let Some(result) = self.try_words(Strategy::FirstSegment, &original, Some(threshold)) {
            return Some(result);
        }

        if let Some(translated_segment) = input.translated.as_deref().and_then(|t| self.first_segment(t)) {
            let translated = self
                .tokenizer
                .analyze_as(&translated_segment, WordSource::Translated);
            if let Some(result) = self.try_words(Strategy::FirstSegment, &translated, Some(threshold)) {
                return Some(result);
            }
        }

        self.try_plain(Strategy::FirstSegment, &segment, Some(threshold))
    }

    /// 空格前的部分；无空格的中文文本在开启设置时取第一个词
    fn first_segment(&self, text: &str) -> Option<String> {
        let normalized = text.replace('_', " ");
        let normalized = normalized.trim();
        if let Some((head, _)) = normalized.split_once(char::is_whitespace) {
            let head = head.trim();
            return (!head.is_empty()).then(|| head.to_string());
        }

        if self.settings.first_segment_for_cjk && contains_cjk(normalized) {
            let words = self.tokenizer.analyze(normalized);
            // 只有一个词时与整体相同，没有重试意义
            if words.len() > 1 {
                return words.into_iter().next().map(|w| w.word);
            }
        }
        None
    }
}

/// 去掉扩展名
fn file_stem(filename: &str) -> &str {
    std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}
