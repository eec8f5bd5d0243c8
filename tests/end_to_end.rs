//! Integration tests for extraction, notice rendering and configuration loading

use std::io::Write;

use tempfile::NamedTempFile;
use tuanfang::models::{Association, DatePairing, PriceGrammar, RoomTemplate};
use tuanfang::{
    BookingRecord, Config, ExtractionError, NoticeGenerator, RoomLineItem, TeamCategory,
};

const SAMPLE_LINES: [&str; 7] = [
    "CON045/SPRINGCO",
    "12/19 18:00",
    "12/21 10:00",
    "STS 32",
    "580.00 BRK2,NSV",
    "JKN 50",
    "420.00",
];

#[test]
fn test_sample_end_to_end() {
    let generator = NoticeGenerator::default();
    let record = generator.extract(&SAMPLE_LINES.join("\n")).unwrap();

    assert_eq!(record.team_identifier, "CON045/SPRINGCO");
    assert_eq!(record.team_category, TeamCategory::Conference);
    assert_eq!(record.arrival_phrase().as_deref(), Some("12月19日"));
    assert_eq!(record.departure_phrase().as_deref(), Some("12月21日"));
    assert_eq!(
        record.room_line_items,
        vec![RoomLineItem::new("STS", 32, 580), RoomLineItem::new("JKN", 50, 420)]
    );

    let notice = generator.notify(&record);
    assert!(notice.starts_with("新增会议团 CON045/SPRINGCO 12月19日至12月21日 "));
    assert!(notice.ends_with("32 STS(580)，以及50 JKN(420)。销售通知"));
}

#[test]
fn test_synthetic_single_room_round_trip() {
    let text = "预订单\nFIT001/ABC\n到店 5/1 离店 5/2\nSTS 5\n备注\n300.00\n";
    let generator = NoticeGenerator::default();
    let record = generator.extract(text).unwrap();
    assert_eq!(record.room_line_items, vec![RoomLineItem::new("STS", 5, 300)]);
    assert_eq!(
        generator.notify(&record),
        "新增散客团 FIT001/ABC 5月1日至5月2日 5 STS(300)。销售通知"
    );
}

#[test]
fn test_text_without_team_code() {
    let generator = NoticeGenerator::default();
    for text in ["12/19 STS 32 580.00", "CONFERENCE 12/19", "FIT/ABC 5/1", "WA/12"] {
        assert_eq!(
            generator.extract(text),
            Err(ExtractionError::TeamIdentifierNotFound),
            "{}",
            text
        );
    }
}

#[test]
fn test_category_for_each_prefix() {
    let generator = NoticeGenerator::default();
    let cases = [
        ("CON1/A", TeamCategory::Conference),
        ("FIT2/B", TeamCategory::Individual),
        ("WA3/C", TeamCategory::Wedding),
    ];
    for (team, expected) in cases {
        let text = format!("{}\n5/1\nSTS 5\n300.00", team);
        let record = generator.extract(&text).unwrap();
        assert_eq!(record.team_category, expected);
    }
}

#[test]
fn test_ordering_independent_of_discovery() {
    let text = "FIT9/Z\n7/1 7/3\nJKN 40\n400.00\nSTS 10\n500.00\nDKN 25\n450.00";
    let record = NoticeGenerator::default().extract(text).unwrap();
    let counts: Vec<u32> = record.room_line_items.iter().map(|i| i.count).collect();
    assert_eq!(counts, vec![10, 25, 40]);
}

#[test]
fn test_misread_count_dropped_silently() {
    let text = "CON045/SPRINGCO\n12/19\n12/21\nSTS 3Z\n580.00\nJKN 50\n420.00";
    let generator = NoticeGenerator::default();
    let record = generator.extract(text).unwrap();
    assert_eq!(record.room_line_items, vec![RoomLineItem::new("JKN", 50, 420)]);
    assert!(!generator.notify(&record).contains("STS"));
}

#[test]
fn test_no_room_price_pairs_reports_team() {
    let text = "CON045/SPRINGCO\n12/19\n12/21\nSTS 32\n团体\n580.00";
    let err = NoticeGenerator::default().extract(text).unwrap_err();
    match err {
        ExtractionError::NoRoomLineItemsMatched {
            ref team_identifier, ..
        } => assert_eq!(team_identifier, "CON045/SPRINGCO"),
        other => panic!("unexpected failure: {:?}", other),
    }
}

#[test]
fn test_hand_edited_empty_record_formats() {
    let json = r#"{
        "team_identifier": "CON045/SPRINGCO",
        "team_category": "conference",
        "arrival_date": {"month": 12, "day": 19},
        "departure_date": {"month": 12, "day": 21},
        "room_line_items": []
    }"#;
    let record: BookingRecord = serde_json::from_str(json).unwrap();
    assert_eq!(
        NoticeGenerator::default().notify(&record),
        "新增会议团 CON045/SPRINGCO 12月19日至12月21日 无房间明细。销售通知"
    );
}

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let config_content = r#"{
        "extractor": {
            "room_codes": ["sts", "qq"],
            "date_pairing": "document_order",
            "price_grammar": "bare_integer_allowed",
            "association": "line_scoped"
        },
        "notice": {
            "date_connector": "-",
            "room_template": "localized"
        }
    }"#;
    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.extractor.room_codes, vec!["STS", "QQ"]);
    assert_eq!(config.extractor.date_pairing, DatePairing::DocumentOrder);
    assert_eq!(config.extractor.price_grammar, PriceGrammar::BareIntegerAllowed);
    assert_eq!(config.extractor.association, Association::LineScoped);
    assert_eq!(config.notice.room_template, RoomTemplate::Localized);
    assert_eq!(config.notice.empty_rooms_placeholder, "无房间明细");

    let generator = NoticeGenerator::new(config);
    let notice = generator
        .generate("WA8/WANG\n10/3\n10/1\nQQ 6\n880")
        .unwrap();
    assert_eq!(notice, "新增婚宴团 WA8/WANG 10月3日-10月1日 6间QQ(880元)。销售通知");
}

#[test]
fn test_invalid_config_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"{ not json").unwrap();
    temp_file.flush().unwrap();
    assert!(Config::from_file(temp_file.path()).is_err());
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/tuanfang.json");
    assert_eq!(config, Config::default());
}
