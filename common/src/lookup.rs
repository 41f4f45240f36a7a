//! 分类名查找表
//!
//! 分类名 → 分类 ID、分类名 → 中文名。查不到时返回默认值（Misc / 杂项），不会失败。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CATEGORY: &str = "Misc";
pub const DEFAULT_CATEGORY_ID: &str = "MISC";
pub const DEFAULT_CATEGORY_ZH: &str = "杂项";

/// 查找表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTables {
    /// 分类名 → 分类 ID
    #[serde(default)]
    pub category_to_id: HashMap<String, String>,
    /// 分类名 → 中文名
    #[serde(default)]
    pub category_to_zh: HashMap<String, String>,
}

impl CategoryTables {
    /// 内置预设
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ucs" | "default" | "默认" => Some(Self::ucs_preset()),
            "empty" | "空" => Some(Self::default()),
            _ => None,
        }
    }

    /// JSON 字符串读取
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json)?;
        Ok(tables)
    }

    /// JSON 文件读取
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// UCS 主分类预设
    fn ucs_preset() -> Self {
        let entries: &[(&str, &str, &str)] = &[
            ("Air", "AIR", "空气"),
            ("Aircraft", "AIRC", "飞行器"),
            ("Alarms", "ALRM", "警报"),
            ("Ambience", "AMB", "环境"),
            ("Animals", "ANML", "动物"),
            ("Bells", "BELL", "铃声"),
            ("Birds", "BIRD", "鸟类"),
            ("Boats", "BOAT", "船"),
            ("Cartoon", "TOON", "卡通"),
            ("Ceramics", "CERM", "陶瓷"),
            ("Chemicals", "CHEM", "化学"),
            ("Clocks", "CLOCK", "钟表"),
            ("Cloth", "CLOTH", "布料"),
            ("Communications", "COMM", "通信"),
            ("Computers", "COMP", "电脑"),
            ("Crashes", "CRSH", "碰撞"),
            ("Creatures", "CREA", "生物"),
            ("Crowds", "CROWD", "人群"),
            ("Design", "DSGN", "设计音效"),
            ("Destruction", "DEST", "破坏"),
            ("Dirt & Sand", "DIRT", "泥沙"),
            ("Doors", "DOOR", "门"),
            ("Drawers", "DRWR", "抽屉"),
            ("Electricity", "ELEC", "电"),
            ("Explosions", "EXPL", "爆炸"),
            ("Fire", "FIRE", "火"),
            ("Foley", "FOLY", "拟音"),
            ("Footsteps", "FEET", "脚步"),
            ("Food & Drink", "FOOD", "饮食"),
            ("Glass", "GLAS", "玻璃"),
            ("Guns", "GUNS", "枪械"),
            ("Human", "HUMN", "人声"),
            ("Impacts", "IMPT", "撞击"),
            ("Lasers", "LASR", "激光"),
            ("Machines", "MACH", "机械"),
            ("Magic", "MAGC", "魔法"),
            ("Mechanical", "MECH", "机械装置"),
            ("Metal", "METL", "金属"),
            ("Motors", "MOTR", "马达"),
            ("Music", "MUSC", "音乐"),
            ("Nature", "NATR", "自然"),
            ("Paper", "PAPR", "纸"),
            ("Rain", "RAIN", "雨"),
            ("Rocks", "ROCK", "岩石"),
            ("Sci-Fi", "SCI", "科幻"),
            ("Snow", "SNOW", "雪"),
            ("Swooshes", "SWSH", "呼啸"),
            ("Tools", "TOOL", "工具"),
            ("Toys", "TOY", "玩具"),
            ("Trains", "TRAN", "火车"),
            ("User Interface", "UI", "界面"),
            ("Vehicles", "VEH", "载具"),
            ("Voices", "VOX", "语音"),
            ("Water", "WATR", "水"),
            ("Weapons", "WEAP", "武器"),
            ("Weather", "WTHR", "天气"),
            ("Whooshes", "WHSH", "嗖声"),
            ("Wind", "WIND", "风"),
            ("Wood", "WOOD", "木头"),
            ("Misc", DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_ZH),
        ];

        let mut tables = Self::default();
        for (name, id, zh) in entries {
            tables.category_to_id.insert((*name).into(), (*id).into());
            tables.category_to_zh.insert((*name).into(), (*zh).into());
        }
        tables
    }

    /// 完全一致优先（不区分大小写），其次最长部分一致
    fn lookup<'a>(&'a self, value: &str, table: &'a HashMap<String, String>) -> Option<&'a str> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let lower = value.to_lowercase();

        if let Some((_, v)) = table.iter().find(|(k, _)| k.to_lowercase() == lower) {
            return Some(v.as_str());
        }

        // 部分一致（最长匹配，长度相同时按键排序保证确定性）
        let mut best_match: Option<(&str, &str)> = None;
        for (pattern, replacement) in table {
            let p = pattern.to_lowercase();
            if p.chars().count() < 3 || !lower.contains(&p) {
                continue;
            }
            let better = match best_match {
                None => true,
                Some((best, _)) => {
                    pattern.len() > best.len() || (pattern.len() == best.len() && pattern.as_str() < best)
                }
            };
            if better {
                best_match = Some((pattern.as_str(), replacement.as_str()));
            }
        }
        best_match.map(|(_, replacement)| replacement)
    }

    /// 分类名 → 分类 ID（默认 MISC）
    pub fn category_id(&self, category: &str) -> String {
        self.lookup(category, &self.category_to_id)
            .unwrap_or(DEFAULT_CATEGORY_ID)
            .to_string()
    }

    /// 分类名 → 中文名（默认 杂项）
    pub fn category_zh(&self, category: &str) -> String {
        self.lookup(category, &self.category_to_zh)
            .unwrap_or(DEFAULT_CATEGORY_ZH)
            .to_string()
    }

    /// 合并（后加入的优先）
    pub fn merge(&mut self, other: &CategoryTables) {
        self.category_to_id.extend(other.category_to_id.clone());
        self.category_to_zh.extend(other.category_to_zh.clone());
    }
}

/// 预设 + 自定义 JSON 构建查找表
pub fn build_tables(preset: Option<&str>, custom_json: Option<&str>) -> Result<CategoryTables> {
    let mut tables = CategoryTables::default();

    if let Some(preset_name) = preset {
        match CategoryTables::from_preset(preset_name) {
            Some(preset_tables) => tables.merge(&preset_tables),
            None => tracing::warn!(preset = preset_name, "未知的查找表预设 (ucs/empty)"),
        }
    }

    if let Some(json) = custom_json {
        let custom = CategoryTables::from_json(json)?;
        tables.merge(&custom);
    }

    Ok(tables)
}
