//! SFX Renamer Common Library
//!
//! 音效文件名的分词、术语匹配、分类和命名。
//! CLI 和其他前端共享的纯逻辑部分。

pub mod catalogue;
pub mod classifier;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod naming;
pub mod parser;
pub mod prompts;
pub mod settings;
pub mod text;
pub mod tokenizer;
pub mod types;

pub use catalogue::{CatalogueRow, TermCatalogue};
pub use classifier::{ClassificationResult, Classifier, ClassifyInput};
pub use error::{Error, Result};
pub use lookup::{build_tables, CategoryTables};
pub use matcher::{build_matcher, FuzzyMatcher, MatchOptions, Matcher, TokenMatcher};
pub use naming::{extract_number, format_name, sanitize_filename, FileRecord, NameFormatter};
pub use parser::{extract_json, parse_ai_hint};
pub use prompts::build_ai_classification_prompt;
pub use settings::{
    ClassifierSettings, EngineKind, FuzzySettings, MatchWeights, NamingMode, NamingSettings, Settings,
    Strategy, TokenizerSettings, UcsField,
};
pub use tokenizer::{LocalProvider, PosProvider, Tokenizer};
pub use types::{AiHint, MatchResult, MatchedWord, Pos, TermRecord, WordInfo, WordSource};
