mod common;

use common::{CONFIG_JSON, sample_labels};
use inspection_pdf::{Error, FieldEntry, LabelResolver, Labels, LayoutOptions, ReportConfig};

#[test]
fn nested_labels_flatten_to_dotted_keys() {
    let labels = Labels::from_json_str(
        r#"{"slide": {"title": "Slide", "fields": {"runout": "Runout"}}, "version": 3}"#,
    )
    .unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(labels.translate("slide.title").unwrap(), "Slide");
    assert_eq!(labels.translate("slide.fields.runout").unwrap(), "Runout");
    assert_eq!(labels.translate("version").unwrap(), "3");
}

#[test]
fn unknown_label_is_an_error() {
    let labels = sample_labels();
    match labels.translate("slide.fields.nonexistent") {
        Err(Error::MissingLabel(key)) => assert_eq!(key, "slide.fields.nonexistent"),
        other => panic!("expected MissingLabel, got {other:?}"),
    }
    // A namespace is not a label.
    assert!(labels.translate("slide").is_err());
}

#[test]
fn non_string_labels_are_rejected() {
    assert!(matches!(
        Labels::from_json_str(r#"{"shared": {"yes": true}}"#),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        Labels::from_json_str(r#"{"shared": ["a"]}"#),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(Labels::from_json_str("{"), Err(Error::Json(_))));
}

#[test]
fn labels_can_be_built_in_code() {
    let mut labels = Labels::new().with("a", "A");
    assert!(!labels.is_empty());
    labels.insert("b", "B");
    assert_eq!(labels.translate("b").unwrap(), "B");
    assert!(Labels::default().is_empty());
}

#[test]
fn empty_config_uses_defaults() {
    let config = ReportConfig::from_json_str("{}").unwrap();
    assert!(config.categories.is_empty());
    let d = LayoutOptions::default();
    assert_eq!(config.layout.column_count, d.column_count);
    assert_eq!(config.layout.font_candidates, vec![9.0, 8.0, 7.0, 6.0, 5.0]);
    assert_eq!(config.layout.line_height, 1.2);
    assert!(config.fonts.regular.is_none());
}

#[test]
fn partial_layout_keeps_other_defaults() {
    let config =
        ReportConfig::from_json_str(r#"{"layout": {"column_count": 2, "margin": 20}}"#).unwrap();
    assert_eq!(config.layout.column_count, 2);
    assert_eq!(config.layout.margin, 20.0);
    assert_eq!(config.layout.column_gutter, LayoutOptions::default().column_gutter);
}

#[test]
fn field_entries_mix_names_and_headers() {
    let config = ReportConfig::from_json_str(CONFIG_JSON).unwrap();
    let slide = &config.categories[0];
    assert_eq!(slide.key, "slide");
    assert_eq!(slide.fields[0], FieldEntry::Field("slide_platform_height".into()));
    assert_eq!(
        slide.fields[2],
        FieldEntry::Header {
            header: "slide.headers.walls".into()
        }
    );
    assert_eq!(config.layout.column_count, 3);
}

#[test]
fn invalid_configs_are_rejected() {
    let cases = [
        r#"{"layout": {"column_count": 0}}"#,
        r#"{"layout": {"font_candidates": []}}"#,
        r#"{"layout": {"line_height": 0}}"#,
        r#"{"layout": {"margin": 400}}"#,
        r#"{"layout": {"footer_height": 0}}"#,
        r#"{"layout": {"footer_height": -10}}"#,
        r#"{"categories": [{"key": "slide"}, {"key": "slide"}]}"#,
    ];
    for json in cases {
        assert!(
            matches!(ReportConfig::from_json_str(json), Err(Error::InvalidConfig(_))),
            "{json}"
        );
    }
    assert!(matches!(
        ReportConfig::from_json_str(r#"{"categories": 5}"#),
        Err(Error::Json(_))
    ));
}
