mod common;

use std::collections::BTreeMap;

use common::{category, field, header, init_logging, sample_config, sample_labels, sample_report};
use inspection_pdf::{
    Error, FieldDescriptor, FieldValue, GroupedEntry, Labels, Line, LineKind, PassFail, Record,
    base_name, build_section, build_sections, group_fields,
};

fn record(json: &str) -> Record {
    serde_json::from_str(json).expect("record parses")
}

#[test]
fn base_name_strips_known_suffixes() {
    assert_eq!(base_name("slide_wall_height_pass"), "slide_wall_height");
    assert_eq!(base_name("runout_comment"), "runout");
    assert_eq!(base_name("runout"), "runout");
    assert_eq!(base_name("bypass"), "bypass");
    assert_eq!(base_name("_pass"), "_pass");
}

#[test]
fn fields_group_by_base_in_first_appearance_order() {
    let grouped = group_fields(&[
        field("height_comment"),
        field("width"),
        header("walls"),
        field("height"),
        field("height_pass"),
        field("width_pass"),
    ]);
    assert_eq!(
        grouped,
        vec![
            GroupedEntry::Field(FieldDescriptor {
                base: "height".into(),
                value_field: Some("height".into()),
                pass_field: Some("height_pass".into()),
                comment_field: Some("height_comment".into()),
            }),
            GroupedEntry::Field(FieldDescriptor {
                base: "width".into(),
                value_field: Some("width".into()),
                pass_field: Some("width_pass".into()),
                comment_field: None,
            }),
            GroupedEntry::Header("walls".into()),
        ]
    );
}

#[test]
fn sample_report_builds_expected_sections() {
    init_logging();
    let config = sample_config();
    let report = sample_report();
    let sections = build_sections(&config.categories, &report.assessments, &sample_labels())
        .expect("sections build");

    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Slide", "Structure", "Anchorage", "Materials"]);

    let slide = &sections[0].lines;
    assert_eq!(
        slide,
        &vec![
            Line::value(Some("Platform height".into()), Some("1.8".into()), None),
            Line::comment("Measured at centre"),
            Line::header("Walls"),
            Line::value(
                Some("Wall height".into()),
                Some("1.2".into()),
                Some(PassFail::Pass)
            ),
            Line::status("Runout".into(), "fail".into(), PassFail::Fail),
            Line::comment("Runout too short for platform height"),
        ]
    );

    let structure = &sections[1].lines;
    assert_eq!(
        structure,
        &vec![
            Line::status("Seam integrity".into(), "pass".into(), PassFail::Pass),
            Line::value(Some("Lifting straps".into()), Some("No".into()), None),
            Line::value(Some("Stitch length".into()), Some("9".into()), None),
        ]
    );

    let anchorage = &sections[2].lines;
    assert_eq!(
        anchorage,
        &vec![Line::value(
            Some("Anchors".into()),
            Some("6".into()),
            Some(PassFail::Pass)
        )]
    );

    assert_eq!(
        sections[3].lines,
        vec![Line::placeholder("No assessment data recorded")]
    );
}

#[test]
fn record_without_matching_fields_yields_placeholder() {
    let labels = sample_labels();
    let cat = category("materials", vec![field("fabric"), field("fabric_pass")]);

    let empty = record("{}");
    let unrelated = record(r#"{"colour": "red", "fabric": null, "fabric_pass": "  "}"#);
    for rec in [&empty, &unrelated] {
        let section = build_section(&cat, Some(rec), &labels).unwrap();
        assert_eq!(section.lines.len(), 1);
        assert_eq!(section.lines[0].kind, LineKind::Value);
        assert_eq!(
            section.lines[0].value.as_deref(),
            Some("No assessment data recorded")
        );
    }

    let absent = build_section(&cat, None, &labels).unwrap();
    assert_eq!(absent.lines, vec![Line::placeholder("No assessment data recorded")]);
}

#[test]
fn comment_survives_missing_value() {
    let labels = sample_labels();
    let cat = category("slide", vec![field("runout"), field("runout_comment")]);
    let rec = record(r#"{"runout_comment": "Not measured, unit deflated"}"#);
    let section = build_section(&cat, Some(&rec), &labels).unwrap();
    assert_eq!(section.lines, vec![Line::comment("Not measured, unit deflated")]);
}

#[test]
fn sub_header_needs_a_following_line() {
    let labels = sample_labels();
    let cat = category(
        "slide",
        vec![
            header("slide.headers.walls"),
            field("slide_wall_height"),
            header("slide.headers.walls"),
            field("runout"),
        ],
    );
    let rec = record(r#"{"slide_wall_height": 1.5}"#);
    let section = build_section(&cat, Some(&rec), &labels).unwrap();
    assert_eq!(
        section.lines,
        vec![
            Line::header("Walls"),
            Line::value(Some("Wall height".into()), Some("1.5".into()), None),
        ]
    );
}

#[test]
fn pass_field_status_reads_three_ways() {
    let labels = sample_labels();
    let cat = category("slide", vec![field("runout"), field("runout_pass")]);

    let cases = [
        (r#"{"runout": 2, "runout_pass": true}"#, Some(PassFail::Pass)),
        (r#"{"runout": 2, "runout_pass": "FAIL"}"#, Some(PassFail::Fail)),
        (r#"{"runout": 2, "runout_pass": null}"#, Some(PassFail::NotApplicable)),
        (r#"{"runout": 2, "runout_pass": "maybe"}"#, Some(PassFail::NotApplicable)),
        (r#"{"runout": 2}"#, Some(PassFail::NotApplicable)),
    ];
    for (json, expected) in cases {
        let section = build_section(&cat, Some(&record(json)), &labels).unwrap();
        assert_eq!(section.lines[0].pass_fail, expected, "{json}");
        assert!(!section.lines[0].status_only);
    }
}

#[test]
fn pass_fail_from_value() {
    assert_eq!(PassFail::from_value(Some(&FieldValue::Bool(true))), PassFail::Pass);
    assert_eq!(PassFail::from_value(Some(&FieldValue::Bool(false))), PassFail::Fail);
    assert_eq!(
        PassFail::from_value(Some(&FieldValue::Text("Pass".into()))),
        PassFail::Pass
    );
    assert_eq!(
        PassFail::from_value(Some(&FieldValue::Text("fail".into()))),
        PassFail::Fail
    );
    assert_eq!(
        PassFail::from_value(Some(&FieldValue::Integer(0))),
        PassFail::NotApplicable
    );
    assert_eq!(PassFail::from_value(None), PassFail::NotApplicable);
}

#[test]
fn missing_label_is_fatal() {
    let labels = Labels::new()
        .with("slide.title", "Slide")
        .with("pdf.assessments.no_data", "No data");
    let cat = category("slide", vec![field("runout")]);
    let rec = record(r#"{"runout": 3}"#);

    match build_section(&cat, Some(&rec), &labels) {
        Err(Error::MissingLabel(key)) => assert_eq!(key, "slide.fields.runout"),
        other => panic!("expected MissingLabel, got {other:?}"),
    }

    let untitled = category("anchorage", vec![]);
    assert!(matches!(
        build_section(&untitled, None, &labels),
        Err(Error::MissingLabel(key)) if key == "anchorage.title"
    ));
}

#[test]
fn missing_value_never_asks_for_its_label() {
    // No label for the field exists; it is skipped before translation.
    let labels = Labels::new()
        .with("slide.title", "Slide")
        .with("pdf.assessments.no_data", "No data");
    let cat = category("slide", vec![field("runout")]);
    let section = build_section(&cat, Some(&record(r#"{"runout": null}"#)), &labels).unwrap();
    assert_eq!(section.lines, vec![Line::placeholder("No data")]);
}

#[test]
fn sections_follow_config_order_and_ignore_unknown_records() {
    let labels = sample_labels();
    let categories = vec![
        category("materials", vec![field("fabric")]),
        category("slide", vec![field("runout")]),
    ];
    let mut assessments: BTreeMap<String, Record> = BTreeMap::new();
    assessments.insert("slide".into(), record(r#"{"runout": 1.5}"#));
    assessments.insert("ballpit".into(), record(r#"{"depth": 0.4}"#));

    let sections = build_sections(&categories, &assessments, &labels).unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Materials");
    assert_eq!(sections[1].title, "Slide");
    assert_eq!(
        sections[1].lines,
        vec![Line::value(Some("Runout".into()), Some("1.5".into()), None)]
    );
}
