//! 术语词表模块
//!
//! 音效分类词表（UCS 风格的 CatID 列表）的读取与检索。
//! 支持 CSV / JSON / XLSX，缺少 `SubCategory` 或 `CatID` 的行会被跳过。

use crate::error::{Error, Result};
use crate::types::TermRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// 词表的一行（列名与 CSV 表头一致）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueRow {
    #[serde(rename = "SubCategory")]
    pub sub_category: String,
    #[serde(rename = "SubCategory_zh")]
    pub sub_category_zh: String,
    #[serde(rename = "CatID")]
    pub cat_id: String,
    #[serde(rename = "CatShort")]
    pub cat_short: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Category_zh")]
    pub category_zh: String,
    #[serde(rename = "Synonyms")]
    pub synonyms: String,
    #[serde(rename = "Synonyms_zh")]
    pub synonyms_zh: String,
}

impl CatalogueRow {
    /// 转换为术语；必填字段缺失时返回 None
    fn into_term(self) -> Option<TermRecord> {
        let source = self.sub_category.trim().to_string();
        let cat_id = self.cat_id.trim().to_string();
        if source.is_empty() || cat_id.is_empty() {
            return None;
        }

        let target = match self.sub_category_zh.trim() {
            "" => source.clone(),
            zh => zh.to_string(),
        };
        let cat_short = match self.cat_short.trim() {
            "" => cat_id.chars().take(4).collect(),
            short => short.to_string(),
        };

        Some(TermRecord {
            source,
            target,
            cat_id,
            cat_short,
            category: self.category.trim().to_string(),
            category_name_zh: self.category_zh.trim().to_string(),
            synonyms: self.synonyms.trim().to_string(),
            synonyms_zh: self.synonyms_zh.trim().to_string(),
        })
    }
}

/// 读取后不可变的术语词表
#[derive(Debug, Clone, Default)]
pub struct TermCatalogue {
    terms: Vec<TermRecord>,
    /// CatID → terms 下标
    by_cat_id: HashMap<String, usize>,
    /// 分类名一览
    categories: BTreeSet<String>,
}

impl TermCatalogue {
    /// 从行序列构建
    ///
    /// 重复 CatID 以先出现者为准。一行有效数据都没有时返回错误。
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = CatalogueRow>,
    {
        let mut catalogue = Self::default();
        let mut skipped = 0usize;

        for (line, row) in rows.into_iter().enumerate() {
            let Some(term) = row.into_term() else {
                warn!(row = line + 1, "SubCategory 或 CatID 为空，跳过该行");
                skipped += 1;
                continue;
            };

            if catalogue.by_cat_id.contains_key(&term.cat_id) {
                warn!(row = line + 1, cat_id = %term.cat_id, "重复的 CatID，保留先出现的行");
                skipped += 1;
                continue;
            }

            if !term.category.is_empty() {
                catalogue.categories.insert(term.category.clone());
            }
            catalogue.by_cat_id.insert(term.cat_id.clone(), catalogue.terms.len());
            catalogue.terms.push(term);
        }

        if catalogue.terms.is_empty() {
            return Err(Error::Catalogue(format!(
                "没有有效的词表行（跳过 {} 行）",
                skipped
            )));
        }

        debug!(terms = catalogue.terms.len(), skipped, "词表读取完成");
        Ok(catalogue)
    }

    /// 直接从术语构建（测试和内部筛选用）
    pub fn from_terms(terms: Vec<TermRecord>) -> Result<Self> {
        let rows = terms.into_iter().map(|t| CatalogueRow {
            sub_category: t.source,
            sub_category_zh: t.target,
            cat_id: t.cat_id,
            cat_short: t.cat_short,
            category: t.category,
            category_zh: t.category_name_zh,
            synonyms: t.synonyms,
            synonyms_zh: t.synonyms_zh,
        });
        Self::from_rows(rows)
    }

    /// CSV 字符串读取（按表头名取列，不区分大小写）
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut records = parse_csv_records(content.trim_start_matches('\u{feff}')).into_iter();
        let header = records
            .next()
            .ok_or_else(|| Error::Catalogue("CSV 为空".into()))?;
        let columns = ColumnMap::from_header(&header)?;

        let rows: Vec<CatalogueRow> = records.map(|fields| columns.row(&fields)).collect();
        Self::from_rows(rows)
    }

    /// JSON 数组读取（元素为以列名为键的对象）
    pub fn from_json_str(content: &str) -> Result<Self> {
        let rows: Vec<CatalogueRow> = serde_json::from_str(content)?;
        Self::from_rows(rows)
    }

    /// XLSX 读取（第一个工作表，第一行为表头）
    #[cfg(feature = "xlsx")]
    pub fn from_xlsx(path: &Path) -> Result<Self> {
        use calamine::{open_workbook_auto, Reader};

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| Error::Catalogue(format!("无法打开工作簿: {}", e)))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Catalogue("工作簿没有工作表".into()))?
            .map_err(|e| Error::Catalogue(format!("工作表读取失败: {}", e)))?;

        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| Error::Catalogue("工作表为空".into()))?
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        let columns = ColumnMap::from_header(&header)?;

        let records: Vec<CatalogueRow> = rows
            .map(|cells| {
                let fields: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                columns.row(&fields)
            })
            .collect();
        Self::from_rows(records)
    }

    /// 按扩展名选择读取方式
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?),
            #[cfg(feature = "xlsx")]
            "xlsx" | "xls" | "ods" => Self::from_xlsx(path),
            _ => Self::from_csv_str(&std::fs::read_to_string(path)?),
        }
    }

    /// CatID 检索；不存在时返回 None
    pub fn find_term_by_cat_id(&self, cat_id: &str) -> Option<&TermRecord> {
        self.by_cat_id
            .get(cat_id.trim())
            .and_then(|&i| self.terms.get(i))
    }

    pub fn contains(&self, cat_id: &str) -> bool {
        self.find_term_by_cat_id(cat_id).is_some()
    }

    /// 全部术语（读取顺序）
    pub fn terms(&self) -> &[TermRecord] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 分类名一览（排序、去重）
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|s| s.as_str()).collect()
    }

    /// 指定分类下的术语
    pub fn terms_in_category(&self, category: &str) -> Vec<&TermRecord> {
        self.terms
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// 某术语的全部同义词（英文在前）
    pub fn synonyms_of(&self, cat_id: &str) -> Vec<&str> {
        self.find_term_by_cat_id(cat_id)
            .map(|t| {
                let mut list = t.synonym_list();
                list.extend(t.synonym_zh_list());
                list
            })
            .unwrap_or_default()
    }

    /// 只保留指定分类的新词表
    pub fn filter_by_categories(&self, categories: &[String]) -> Result<Self> {
        if categories.is_empty() {
            return Ok(self.clone());
        }

        let terms: Vec<TermRecord> = self
            .terms
            .iter()
            .filter(|t| categories.iter().any(|c| c.eq_ignore_ascii_case(&t.category)))
            .cloned()
            .collect();
        Self::from_terms(terms)
    }
}

/// 表头列名 → 列下标
struct ColumnMap {
    indices: HashMap<&'static str, usize>,
}

const COLUMNS: [&str; 8] = [
    "subcategory",
    "subcategory_zh",
    "catid",
    "catshort",
    "category",
    "category_zh",
    "synonyms",
    "synonyms_zh",
];

impl ColumnMap {
    fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self> {
        let mut indices = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            let normalized = name.as_ref().trim().to_lowercase().replace([' ', '-'], "_");
            let normalized = normalized.replace("sub_category", "subcategory").replace("cat_id", "catid");
            if let Some(column) = COLUMNS.iter().find(|c| **c == normalized) {
                indices.entry(*column).or_insert(i);
            }
        }

        if !indices.contains_key("subcategory") || !indices.contains_key("catid") {
            return Err(Error::Catalogue(
                "表头缺少 SubCategory 或 CatID 列".into(),
            ));
        }
        Ok(Self { indices })
    }

    fn get<S: AsRef<str>>(&self, fields: &[S], column: &str) -> String {
        self.indices
            .get(column)
            .and_then(|&i| fields.get(i))
            .map(|f| f.as_ref().trim().to_string())
            .unwrap_or_default()
    }

    fn row<S: AsRef<str>>(&self, fields: &[S]) -> CatalogueRow {
        CatalogueRow {
            sub_category: self.get(fields, "subcategory"),
            sub_category_zh: self.get(fields, "subcategory_zh"),
            cat_id: self.get(fields, "catid"),
            cat_short: self.get(fields, "catshort"),
            category: self.get(fields, "category"),
            category_zh: self.get(fields, "category_zh"),
            synonyms: self.get(fields, "synonyms"),
            synonyms_zh: self.get(fields, "synonyms_zh"),
        }
    }
}

/// CSV 解析（双引号字段、`""` 转义、引号内换行）
fn parse_csv_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    // 引号内的换行属于字段内容
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => record.push(std::mem::take(&mut field)),
            '\r' if !in_quotes => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut record, &mut field);
            }
            '\n' if !in_quotes => finish_record(&mut records, &mut record, &mut field),
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        finish_record(&mut records, &mut record, &mut field);
    }

    records
}

/// 空行不算记录
fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let fields = std::mem::take(record);
    if !(fields.len() == 1 && fields[0].trim().is_empty()) {
        records.push(fields);
    }
}
