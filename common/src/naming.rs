//! 文件名生成
//!
//! 两种模式：
//! - 模板模式：`{category}_{name}_{serial}` 之类的占位符替换，空占位符连同相邻分隔符一起去掉
//! - UCS 模式：按设置的字段顺序用分隔符连接
//!
//! 纯函数，不做 I/O。扩展名由调用方追加。

use crate::classifier::ClassificationResult;
use crate::lookup::CategoryTables;
use crate::settings::{NamingMode, NamingSettings, UcsField};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// 末尾数字（前面可有 `_` `-` 空格 `#`）
    static ref TRAILING_NUMBER: Regex =
        Regex::new(r"^(.*?)[\s_\-#]*(\d+)$").expect("valid trailing number pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

const ILLEGAL_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
const UNTITLED: &str = "untitled";

/// 命名所需的文件信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileRecord {
    /// 原文件名（不含扩展名）
    pub original_name: String,
    pub extension: String,
    pub cat_id: String,
    pub category: String,
    pub category_zh: String,
    pub sub_category: String,
    pub sub_category_zh: String,
    /// 英文描述
    pub fx_name: String,
    /// 中文描述
    pub fx_name_zh: String,
    pub tags: Vec<String>,
    /// 新编号
    pub serial: Option<u32>,
    /// 原文件名末尾的编号（原样保留）
    pub extracted_number: Option<String>,
}

impl FileRecord {
    /// 文件名（不含扩展名）→ 记录，末尾编号自动提取
    pub fn new(original_name: impl Into<String>) -> Self {
        let original_name = original_name.into();
        let extracted_number = extract_number(&original_name).1;
        Self {
            original_name,
            extracted_number,
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// 分类结果填入
    pub fn with_classification(mut self, result: &ClassificationResult) -> Self {
        let term = &result.term;
        self.cat_id = result.cat_id.clone();
        self.category = term.category.clone();
        self.category_zh = term.category_name_zh.clone();
        self.sub_category = term.source.clone();
        self.sub_category_zh = term.target.clone();
        self
    }

    pub fn with_fx_name(mut self, fx_name: impl Into<String>, fx_name_zh: impl Into<String>) -> Self {
        self.fx_name = fx_name.into();
        self.fx_name_zh = fx_name_zh.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_serial(mut self, serial: u32) -> Self {
        self.serial = Some(serial);
        self
    }
}

/// 末尾编号提取：(去掉编号后的名字, 编号原文)
///
/// ```
/// use sfx_renamer_common::naming::extract_number;
///
/// assert_eq!(extract_number("footsteps on snow 01"), ("footsteps on snow".to_string(), Some("01".to_string())));
/// assert_eq!(extract_number("door slam"), ("door slam".to_string(), None));
/// ```
pub fn extract_number(name: &str) -> (String, Option<String>) {
    let trimmed = name.trim();
    match TRAILING_NUMBER.captures(trimmed) {
        Some(caps) => {
            let base = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let number = caps.get(2).map(|m| m.as_str().to_string());
            (base.to_string(), number)
        }
        None => (trimmed.to_string(), None),
    }
}

/// 文件名清理
///
/// 去掉非法字符和控制字符，合并空白和重复分隔符，去掉首尾分隔符和点。
/// 结果为空时返回 `untitled`。
pub fn sanitize_filename(name: &str, separator: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();
    let mut result = WHITESPACE.replace_all(&cleaned, " ").into_owned();

    if !separator.is_empty() {
        let doubled = separator.repeat(2);
        while result.contains(&doubled) {
            result = result.replace(&doubled, separator);
        }
        // 分隔符两侧的空格
        let spaced_left = format!(" {}", separator);
        let spaced_right = format!("{} ", separator);
        if separator.trim() == separator {
            result = result.replace(&spaced_left, separator).replace(&spaced_right, separator);
        }
    }

    let trimmed = result
        .trim_matches(|c: char| c.is_whitespace() || c == '.' || c == '_' || c == '-' || separator.contains(c))
        .to_string();

    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed
    }
}

/// 全部由分隔符类字符组成（空字符串也算）
fn is_separator_text(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || matches!(c, '_' | '-' | '.' | '·' | '|'))
}

#[derive(Debug, PartialEq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// `{name}` 形式的占位符切分
fn parse_template(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close_offset) = rest[open..].find('}') else {
            break;
        };
        let close = open + close_offset;
        if open > 0 {
            pieces.push(Piece::Literal(&rest[..open]));
        }
        pieces.push(Piece::Placeholder(&rest[open + 1..close]));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }
    pieces
}

/// 文件名生成器
#[derive(Debug, Clone, Default)]
pub struct NameFormatter {
    settings: NamingSettings,
    tables: CategoryTables,
}

impl NameFormatter {
    pub fn new(settings: NamingSettings, tables: CategoryTables) -> Self {
        Self { settings, tables }
    }

    pub fn settings(&self) -> &NamingSettings {
        &self.settings
    }

    /// 新文件名（不含扩展名）
    pub fn format(&self, record: &FileRecord) -> String {
        let raw = match self.settings.mode {
            NamingMode::Ucs => self.render_ucs(record),
            NamingMode::Template => self.render_template(record),
        };
        sanitize_filename(&raw, &self.settings.separator)
    }

    fn category(&self, record: &FileRecord) -> String {
        if record.category.trim().is_empty() {
            self.settings.default_category.clone()
        } else {
            record.category.trim().to_string()
        }
    }

    fn cat_id(&self, record: &FileRecord) -> String {
        if record.cat_id.trim().is_empty() {
            self.tables.category_id(&self.category(record))
        } else {
            record.cat_id.trim().to_string()
        }
    }

    fn category_zh(&self, record: &FileRecord) -> String {
        if record.category_zh.trim().is_empty() {
            self.tables.category_zh(&self.category(record))
        } else {
            record.category_zh.trim().to_string()
        }
    }

    /// 原编号优先，否则按位数补零
    fn serial(&self, record: &FileRecord) -> String {
        if let Some(number) = record.extracted_number.as_deref().filter(|n| !n.is_empty()) {
            return number.to_string();
        }
        record
            .serial
            .map(|n| format!("{:0width$}", n, width = self.settings.serial_width))
            .unwrap_or_default()
    }

    fn field(&self, field: UcsField, record: &FileRecord) -> String {
        match field {
            UcsField::CatId => self.cat_id(record),
            UcsField::Category => self.category(record),
            UcsField::CategoryZh => self.category_zh(record),
            UcsField::SubCategory => record.sub_category.trim().to_string(),
            UcsField::SubCategoryZh => record.sub_category_zh.trim().to_string(),
            UcsField::FxName => record.fx_name.trim().to_string(),
            UcsField::FxNameZh => record.fx_name_zh.trim().to_string(),
            UcsField::CreatorId => self.settings.creator_id.trim().to_string(),
            UcsField::SourceId => self.settings.source_id.trim().to_string(),
            UcsField::Serial => self.serial(record),
        }
    }

    fn render_ucs(&self, record: &FileRecord) -> String {
        self.settings
            .ucs_fields
            .iter()
            .map(|f| self.field(*f, record))
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(&self.settings.separator)
    }

    fn placeholder(&self, name: &str, record: &FileRecord) -> Option<String> {
        let value = match name.trim().to_lowercase().as_str() {
            "category" => self.category(record),
            "category_zh" => self.category_zh(record),
            "catid" | "cat_id" => self.cat_id(record),
            "subcategory" | "sub_category" => record.sub_category.trim().to_string(),
            "subcategory_zh" | "sub_category_zh" => record.sub_category_zh.trim().to_string(),
            "name" | "fx_name" => record.fx_name.trim().to_string(),
            "name_zh" | "fx_name_zh" => record.fx_name_zh.trim().to_string(),
            "tags" => record
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(&self.settings.tags_separator),
            "serial" => self.serial(record),
            "creator" | "creator_id" => self.settings.creator_id.trim().to_string(),
            "source" | "source_id" => self.settings.source_id.trim().to_string(),
            "original" => record.original_name.trim().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// 空占位符左侧的分隔符由下一个分隔符取代
    fn render_template(&self, record: &FileRecord) -> String {
        let mut out = String::new();
        let mut pending = String::new();
        let mut last_dropped = false;

        for piece in parse_template(&self.settings.template) {
            match piece {
                Piece::Literal(text) => {
                    if last_dropped && is_separator_text(&pending) {
                        pending = text.to_string();
                    } else {
                        pending.push_str(text);
                    }
                    last_dropped = false;
                }
                Piece::Placeholder(name) => match self.placeholder(name, record) {
                    Some(value) if value.is_empty() => last_dropped = true,
                    Some(value) => {
                        out.push_str(&pending);
                        out.push_str(&value);
                        pending.clear();
                        last_dropped = false;
                    }
                    // 未知占位符原样保留
                    None => {
                        pending.push('{');
                        pending.push_str(name);
                        pending.push('}');
                        last_dropped = false;
                    }
                },
            }
        }

        if !is_separator_text(&pending) {
            out.push_str(&pending);
        }
        out
    }
}

/// 单次调用
pub fn format_name(record: &FileRecord, settings: &NamingSettings, tables: &CategoryTables) -> String {
    NameFormatter::new(settings.clone(), tables.clone()).format(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> FileRecord {
        FileRecord {
            original_name: "footsteps on snow 01".into(),
            extension: "wav".into(),
            cat_id: "FOL001".into(),
            category: "Foley".into(),
            category_zh: "拟音".into(),
            sub_category: "Footstep".into(),
            sub_category_zh: "脚步声".into(),
            fx_name: "Footsteps On Snow".into(),
            fx_name_zh: "雪地脚步".into(),
            tags: vec!["snow".into(), "walk".into()],
            serial: Some(7),
            extracted_number: Some("01".into()),
        }
    }

    fn ucs_settings() -> NamingSettings {
        NamingSettings {
            creator_id: "JD".into(),
            source_id: "LIB".into(),
            ..NamingSettings::default()
        }
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("door_slam-003"), ("door_slam".to_string(), Some("003".to_string())));
        assert_eq!(extract_number("Impact #12"), ("Impact".to_string(), Some("12".to_string())));
        assert_eq!(extract_number("01"), (String::new(), Some("01".to_string())));
        assert_eq!(extract_number("雷声"), ("雷声".to_string(), None));
    }

    #[test]
    fn test_file_record_new_extracts_number() {
        let record = FileRecord::new("footsteps on snow 01");
        assert_eq!(record.extracted_number.as_deref(), Some("01"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c*d?\"e<f>g|h", "_"), "abcdefgh");
        assert_eq!(sanitize_filename("  door   slam  ", "_"), "door slam");
        assert_eq!(sanitize_filename("__door___slam__", "_"), "door_slam");
        assert_eq!(sanitize_filename("door _ slam", "_"), "door_slam");
        assert_eq!(sanitize_filename("..door.", "_"), "door");
        assert_eq!(sanitize_filename("???", "_"), UNTITLED);
        assert_eq!(sanitize_filename("a\u{0007}b", "_"), "ab");
    }

    #[test]
    fn test_ucs_all_fields_in_order_with_original_number() {
        let settings = NamingSettings {
            ucs_fields: vec![
                UcsField::CatId,
                UcsField::Category,
                UcsField::CategoryZh,
                UcsField::SubCategory,
                UcsField::SubCategoryZh,
                UcsField::FxName,
                UcsField::FxNameZh,
                UcsField::CreatorId,
                UcsField::SourceId,
                UcsField::Serial,
            ],
            ..ucs_settings()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        assert_eq!(
            formatter.format(&full_record()),
            "FOL001_Foley_拟音_Footstep_脚步声_Footsteps On Snow_雪地脚步_JD_LIB_01"
        );
    }

    #[test]
    fn test_ucs_skips_empty_fields() {
        let formatter = NameFormatter::new(NamingSettings::default(), CategoryTables::default());
        let record = FileRecord {
            extracted_number: None,
            fx_name_zh: String::new(),
            ..full_record()
        };
        assert_eq!(formatter.format(&record), "FOL001_Footsteps On Snow_07");
    }

    #[test]
    fn test_ucs_serial_width() {
        let settings = NamingSettings {
            serial_width: 3,
            ucs_fields: vec![UcsField::FxName, UcsField::Serial],
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        let record = FileRecord {
            extracted_number: None,
            ..full_record()
        };
        assert_eq!(formatter.format(&record), "Footsteps On Snow_007");
    }

    #[test]
    fn test_unclassified_uses_default_category() {
        let tables = CategoryTables::from_preset("ucs").unwrap();
        let settings = NamingSettings {
            ucs_fields: vec![UcsField::CatId, UcsField::Category, UcsField::CategoryZh, UcsField::FxName],
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, tables);
        let record = FileRecord::new("mystery").with_fx_name("Mystery", "");
        assert_eq!(formatter.format(&record), "MISC_Misc_杂项_Mystery");
    }

    #[test]
    fn test_category_id_from_tables_when_missing() {
        let tables = CategoryTables::from_preset("ucs").unwrap();
        let settings = NamingSettings {
            ucs_fields: vec![UcsField::CatId, UcsField::CategoryZh],
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, tables);
        let record = FileRecord {
            category: "Doors".into(),
            ..FileRecord::default()
        };
        assert_eq!(formatter.format(&record), "DOOR_门");
    }

    #[test]
    fn test_template_basic() {
        let settings = NamingSettings {
            mode: NamingMode::Template,
            template: "{category}_{name}_{tags}_{serial}".into(),
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        assert_eq!(formatter.format(&full_record()), "Foley_Footsteps On Snow_snow-walk_01");
    }

    #[test]
    fn test_template_empty_placeholder_drops_separator() {
        let settings = NamingSettings {
            mode: NamingMode::Template,
            template: "{category} - {name}_{serial}".into(),
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        let record = FileRecord {
            fx_name: String::new(),
            ..full_record()
        };
        assert_eq!(formatter.format(&record), "Foley_01");
    }

    #[test]
    fn test_template_leading_and_trailing_empty() {
        let settings = NamingSettings {
            mode: NamingMode::Template,
            template: "{tags}_{name}_{serial}".into(),
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        let record = FileRecord {
            tags: Vec::new(),
            extracted_number: None,
            serial: None,
            ..full_record()
        };
        assert_eq!(formatter.format(&record), "Footsteps On Snow");
    }

    #[test]
    fn test_template_literal_prefix_and_unknown_placeholder() {
        let settings = NamingSettings {
            mode: NamingMode::Template,
            template: "SFX_{catid}_{unknown}".into(),
            ..NamingSettings::default()
        };
        let formatter = NameFormatter::new(settings, CategoryTables::default());
        assert_eq!(formatter.format(&full_record()), "SFX_FOL001_{unknown}");
    }

    #[test]
    fn test_format_name_helper() {
        let name = format_name(&full_record(), &ucs_settings(), &CategoryTables::default());
        assert!(name.starts_with("FOL001_"));
        assert!(name.ends_with("_JD_LIB_01"));
    }
}
