//! 分类结果 → 文件名

use sfx_renamer_common::{
    build_matcher, build_tables, extract_number, Classifier, ClassifyInput, EngineKind, FileRecord,
    NameFormatter, NamingMode, NamingSettings, Settings, TermCatalogue, TermRecord, Tokenizer, UcsField,
};
use std::sync::Arc;

fn classify_door_slam() -> sfx_renamer_common::ClassificationResult {
    let catalogue = Arc::new(
        TermCatalogue::from_terms(vec![
            TermRecord {
                source: "Slam".into(),
                target: "摔门".into(),
                cat_id: "DOORSlam".into(),
                category: "Doors".into(),
                category_name_zh: "门".into(),
                synonyms: "door slam".into(),
                ..Default::default()
            },
            TermRecord {
                source: "Gust".into(),
                target: "阵风".into(),
                cat_id: "WINDGust".into(),
                category: "Wind".into(),
                ..Default::default()
            },
        ])
        .unwrap(),
    );
    let settings = Settings::default();
    let matcher = build_matcher(EngineKind::Token, catalogue, &settings);
    let classifier = Classifier::new(
        Arc::new(Tokenizer::new(settings.tokenizer.clone())),
        Arc::from(matcher),
        settings.classifier.clone(),
    );

    let (base, number) = extract_number("door slam 07");
    assert_eq!(base, "door slam");
    assert_eq!(number.as_deref(), Some("07"));

    classifier.classify(&ClassifyInput::new(base)).unwrap()
}

fn record() -> FileRecord {
    let result = classify_door_slam();
    assert_eq!(result.cat_id, "DOORSlam");

    FileRecord::new("door slam 07")
        .with_extension("wav")
        .with_fx_name("Door Slam Heavy", "重重摔门")
        .with_serial(1)
        .with_classification(&result)
}

/// UCS 全字段，原编号优先于新编号
#[test]
fn test_ucs_all_fields() {
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
        creator_id: "JD".into(),
        source_id: "LIB".into(),
        ..NamingSettings::default()
    };
    let formatter = NameFormatter::new(settings, build_tables(Some("ucs"), None).unwrap());

    assert_eq!(
        formatter.format(&record()),
        "DOORSlam_Doors_门_Slam_摔门_Door Slam Heavy_重重摔门_JD_LIB_07"
    );
}

/// 模板中的空占位符连同分隔符一起消失
#[test]
fn test_template_with_empty_tags() {
    let settings = NamingSettings {
        mode: NamingMode::Template,
        template: "{catid}-{name}-{tags}-{serial}".into(),
        ..NamingSettings::default()
    };
    let formatter = NameFormatter::new(settings, build_tables(Some("ucs"), None).unwrap());

    assert_eq!(formatter.format(&record()), "DOORSlam-Door Slam Heavy-07");
}

/// 没有原编号时使用补零后的新编号
#[test]
fn test_new_serial_when_no_number() {
    let result = classify_door_slam();
    let record = FileRecord::new("door slam")
        .with_fx_name("Door Slam", "")
        .with_serial(3)
        .with_classification(&result);

    let formatter = NameFormatter::new(NamingSettings::default(), build_tables(None, None).unwrap());
    assert_eq!(formatter.format(&record), "DOORSlam_Door Slam_03");
}
