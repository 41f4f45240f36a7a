//! 引擎设置
//!
//! 所有权重、阈值和策略开关都集中在不可变的 `Settings` 中。
//! 修改通过 `with_*` 返回新值，不在原处打补丁。

use crate::error::Result;
use crate::types::Pos;
use serde::{Deserialize, Serialize};

/// 各词性默认权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosWeights {
    pub noun: f64,
    pub adjective: f64,
    pub verb: f64,
    pub adverb: f64,
    pub other: f64,
}

impl Default for PosWeights {
    fn default() -> Self {
        Self {
            noun: 1.0,
            adjective: 0.9,
            verb: 0.7,
            adverb: 0.5,
            other: 0.3,
        }
    }
}

impl PosWeights {
    pub fn weight_for(&self, pos: Pos) -> f64 {
        match pos {
            Pos::Noun => self.noun,
            Pos::Adjective => self.adjective,
            Pos::Verb => self.verb,
            Pos::Adverb => self.adverb,
            Pos::Other => self.other,
        }
    }
}

/// 分词后过滤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilter {
    pub enabled: bool,
    /// 权重低于此值的纯数字被移除
    pub number_weight_threshold: f64,
    /// 权重低于此值的标点被移除
    pub punctuation_weight_threshold: f64,
    pub remove_function_words: bool,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            number_weight_threshold: 0.5,
            punctuation_weight_threshold: 0.5,
            remove_function_words: true,
        }
    }
}

/// 中文分词器起点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChineseSegmenter {
    /// 词典分词（jieba，带词性）
    #[default]
    Dictionary,
    /// Unicode 词边界
    Unicode,
    /// 单字切分
    Character,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerSettings {
    pub pos_weights: PosWeights,
    pub post_filter: PostFilter,
    pub chinese_segmenter: ChineseSegmenter,
    /// 记忆缓存容量（0 表示不缓存）
    pub cache_capacity: usize,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            pos_weights: PosWeights::default(),
            post_filter: PostFilter::default(),
            chinese_segmenter: ChineseSegmenter::Dictionary,
            cache_capacity: 500,
        }
    }
}

/// 主引擎（词元计数）的权重
///
/// 常数均为经验值，可按需调整。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    /// 单语匹配时原文 : 译文的来源权重
    pub original_source_weight: f64,
    pub translated_source_weight: f64,
    /// 双语匹配时原文 / 译文权重
    pub bilingual_original_weight: f64,
    pub bilingual_translated_weight: f64,

    pub noun_boost: f64,
    pub verb_boost: f64,
    pub adjective_boost: f64,
    pub bilingual_noun_boost: f64,
    pub bilingual_verb_boost: f64,
    pub bilingual_adjective_boost: f64,

    /// 名词同时出现在分类名中时的额外倍率
    pub category_relevance_boost: f64,
    /// 倍率上限
    pub max_multiplier: f64,
    /// 不按词性加权时，与 source / target 完全一致的命中倍率
    pub plain_exact_boost: f64,

    /// 对齐奖励：(原文, 译文)
    pub align_noun: (f64, f64),
    pub align_verb: (f64, f64),
    pub align_adjective: (f64, f64),
    pub align_adverb: (f64, f64),
    pub max_pairs_per_pos: usize,

    pub threshold: f64,
    pub bilingual_threshold: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            original_source_weight: 1.5,
            translated_source_weight: 1.0,
            bilingual_original_weight: 3.5,
            bilingual_translated_weight: 1.0,
            noun_boost: 1.3,
            verb_boost: 1.1,
            adjective_boost: 1.15,
            bilingual_noun_boost: 2.5,
            bilingual_verb_boost: 1.3,
            bilingual_adjective_boost: 1.2,
            category_relevance_boost: 1.5,
            max_multiplier: 3.0,
            plain_exact_boost: 1.1,
            align_noun: (2.5, 1.5),
            align_verb: (1.6, 1.2),
            align_adjective: (1.4, 1.1),
            align_adverb: (1.1, 1.05),
            max_pairs_per_pos: 4,
            threshold: 0.3,
            bilingual_threshold: 0.5,
        }
    }
}

/// 模糊引擎（编辑距离）的字段权重和阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzySettings {
    pub source_weight: f64,
    pub target_weight: f64,
    pub category_weight: f64,
    pub synonyms_weight: f64,
    pub synonyms_zh_weight: f64,
    /// 低于此相似度的字段命中不计
    pub min_similarity: f64,
    /// 0–1 归一化阈值（单语）
    pub threshold: f64,
    /// 0–1000 刻度阈值（双语）
    pub bilingual_threshold: f64,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            source_weight: 1.0,
            target_weight: 1.0,
            category_weight: 0.5,
            synonyms_weight: 0.8,
            synonyms_zh_weight: 0.8,
            min_similarity: 0.5,
            threshold: 0.2,
            bilingual_threshold: 50.0,
        }
    }
}

/// 匹配引擎种类
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Token,
    Fuzzy,
}

/// 分类策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Ai,
    Bilingual,
    PosOriginal,
    PosTranslated,
    PlainOriginal,
    FirstSegment,
}

impl Strategy {
    pub const DEFAULT_ORDER: [Strategy; 6] = [
        Strategy::Ai,
        Strategy::Bilingual,
        Strategy::PosOriginal,
        Strategy::PosTranslated,
        Strategy::PlainOriginal,
        Strategy::FirstSegment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Ai => "ai",
            Strategy::Bilingual => "bilingual",
            Strategy::PosOriginal => "pos_original",
            Strategy::PosTranslated => "pos_translated",
            Strategy::PlainOriginal => "plain_original",
            Strategy::FirstSegment => "first_segment",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub engine: EngineKind,
    /// 按顺序执行；不在列表中的策略即为关闭
    pub strategies: Vec<Strategy>,
    /// 首段启发式使用的阈值倍率
    pub first_segment_threshold_factor: f64,
    /// 无空格的中文文本也尝试首词启发式
    pub first_segment_for_cjk: bool,
    /// 返回给调用方的候选数
    pub alternatives_limit: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::Token,
            strategies: Strategy::DEFAULT_ORDER.to_vec(),
            first_segment_threshold_factor: 0.6,
            first_segment_for_cjk: false,
            alternatives_limit: 5,
        }
    }
}

impl ClassifierSettings {
    pub fn is_enabled(&self, strategy: Strategy) -> bool {
        self.strategies.contains(&strategy)
    }

    /// 关闭某个策略
    pub fn without(&self, strategy: Strategy) -> Self {
        Self {
            strategies: self.strategies.iter().copied().filter(|s| *s != strategy).collect(),
            ..self.clone()
        }
    }

    /// 替换策略顺序
    pub fn with_order(&self, order: &[Strategy]) -> Self {
        Self {
            strategies: order.to_vec(),
            ..self.clone()
        }
    }

    pub fn with_engine(&self, engine: EngineKind) -> Self {
        Self {
            engine,
            ..self.clone()
        }
    }
}

/// 文件名输出模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    Template,
    #[default]
    Ucs,
}

/// UCS 模式可用字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UcsField {
    CatId,
    Category,
    CategoryZh,
    SubCategory,
    SubCategoryZh,
    FxName,
    FxNameZh,
    CreatorId,
    SourceId,
    Serial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    pub mode: NamingMode,
    /// 模板模式：`{category}` `{category_zh}` `{subcategory}` `{catid}` `{name}` `{name_zh}` `{tags}` `{serial}`
    pub template: String,
    pub ucs_fields: Vec<UcsField>,
    pub separator: String,
    pub tags_separator: String,
    pub creator_id: String,
    pub source_id: String,
    pub serial_width: usize,
    /// 未分类时使用的分类名
    pub default_category: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            mode: NamingMode::Ucs,
            template: "{category}_{name}_{serial}".to_string(),
            ucs_fields: vec![
                UcsField::CatId,
                UcsField::FxName,
                UcsField::FxNameZh,
                UcsField::CreatorId,
                UcsField::SourceId,
                UcsField::Serial,
            ],
            separator: "_".to_string(),
            tags_separator: "-".to_string(),
            creator_id: String::new(),
            source_id: String::new(),
            serial_width: 2,
            default_category: "Misc".to_string(),
        }
    }
}

/// 全部设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tokenizer: TokenizerSettings,
    pub matching: MatchWeights,
    pub fuzzy: FuzzySettings,
    pub classifier: ClassifierSettings,
    pub naming: NamingSettings,
}

impl Settings {
    /// JSON 字符串读取（缺省字段使用默认值）
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn with_tokenizer(&self, tokenizer: TokenizerSettings) -> Self {
        Self {
            tokenizer,
            ..self.clone()
        }
    }

    pub fn with_matching(&self, matching: MatchWeights) -> Self {
        Self {
            matching,
            ..self.clone()
        }
    }

    pub fn with_fuzzy(&self, fuzzy: FuzzySettings) -> Self {
        Self {
            fuzzy,
            ..self.clone()
        }
    }

    pub fn with_classifier(&self, classifier: ClassifierSettings) -> Self {
        Self {
            classifier,
            ..self.clone()
        }
    }

    pub fn with_naming(&self, naming: NamingSettings) -> Self {
        Self {
            naming,
            ..self.clone()
        }
    }
}
