use serde_json::json;

use super::*;

fn summary(model: &ChecklistModel) -> Vec<(String, bool, usize)> {
    model
        .items()
        .iter()
        .map(|item| (item.text(), item.checked, item.level))
        .collect()
}

fn is_default(model: &ChecklistModel) -> bool {
    summary(model) == vec![(String::new(), false, 0)]
}

#[test]
fn missing_items_loads_default_model() {
    assert!(is_default(&load(&json!({}))));
    assert!(is_default(&load(&json!({ "items": [] }))));
    assert!(is_default(&load(&json!(null))));
}

#[test]
fn non_array_items_loads_default_model() {
    assert!(is_default(&load(&json!({ "items": "buy milk" }))));
    assert!(is_default(&load(&json!({ "items": { "text": "a" } }))));
}

#[test]
fn loads_items_in_order() {
    let model = load(&json!({
        "items": [
            { "text": "Buy <b>milk</b>", "checked": true, "level": 0 },
            { "text": "skimmed", "checked": false, "level": 1 },
        ]
    }));

    assert_eq!(
        summary(&model),
        vec![
            ("Buy <b>milk</b>".to_string(), true, 0),
            ("skimmed".to_string(), false, 1),
        ]
    );
}

#[test]
fn missing_fields_default() {
    let model = load(&json!({ "items": [{ "text": "a" }, { "checked": true }] }));

    assert_eq!(
        summary(&model),
        vec![("a".to_string(), false, 0), (String::new(), true, 0)]
    );
}

#[test]
fn mistyped_fields_are_coerced() {
    let model = load(&json!({
        "items": [
            { "text": 42, "checked": "true", "level": "2" },
            { "text": null, "checked": 1, "level": -1 },
            { "text": "x", "checked": "TRUE", "level": 1.5 },
        ]
    }));

    assert_eq!(
        summary(&model),
        vec![
            ("42".to_string(), true, 2),
            (String::new(), false, 0),
            ("x".to_string(), true, 0),
        ]
    );
}

#[test]
fn stored_markup_is_canonicalized() {
    let model = load(&json!({ "items": [{ "text": "<strong>a</strong><em>b</em><span>c</span>" }] }));

    assert_eq!(model.items()[0].text(), "<b>a</b><i>b</i>c");
}

#[test]
fn non_object_items_are_skipped() {
    let model = load(&json!({ "items": ["loose", 3, { "text": "kept" }, null] }));

    assert_eq!(summary(&model), vec![("kept".to_string(), false, 0)]);
}

#[test]
fn all_unusable_items_fall_back_to_default() {
    assert!(is_default(&load(&json!({ "items": ["a", 1, true] }))));
}

#[test]
fn from_json_rejects_only_syntax_errors() {
    assert!(matches!(from_json("{ items: "), Err(SerialError::Json(_))));

    let model = from_json(r#"{"items": 5}"#).unwrap();
    assert!(is_default(&model));
}

#[test]
fn save_drops_blank_items() {
    let mut model = ChecklistModel::empty();
    model.push(RichText::from_markup("keep"), true, 1);
    model.push(RichText::new(), false, 0);
    model.push(RichText::from_markup("   "), false, 0);
    model.push(RichText::from_markup("<b> </b>"), false, 0);
    model.push(RichText::from_markup("also"), false, 0);

    let data = save(&model);

    assert_eq!(
        data.items,
        vec![ItemData::new("keep", true, 1), ItemData::new("also", false, 0)]
    );
    assert_eq!(model.len(), 5);
}

#[test]
fn save_keeps_whitespace_around_content() {
    let mut model = ChecklistModel::empty();
    model.push(RichText::from_markup(" padded "), false, 0);

    assert_eq!(save(&model).items[0].text, " padded ");
}

#[test]
fn validate_requires_an_item() {
    let empty = BlockData::default();
    let filled = BlockData {
        items: vec![ItemData::new("a", false, 0)],
    };

    assert!(!validate(&empty));
    assert!(validate(&filled));
    assert_eq!(filled.items.len(), 1);
}

#[test]
fn saving_a_fresh_model_does_not_validate() {
    assert!(!validate(&save(&ChecklistModel::new())));
}

#[test]
fn json_round_trip_keeps_items() {
    let data = BlockData {
        items: vec![
            ItemData::new("a &amp; <i>b</i>", true, 0),
            ItemData::new("c", false, 2),
        ],
    };
    let json = to_json(&data).unwrap();
    let model = from_json(&json).unwrap();

    assert_eq!(save(&model), data);
}

#[test]
fn saved_json_uses_expected_field_names() {
    let data = BlockData {
        items: vec![ItemData::new("a", true, 1)],
    };
    let value: Value = serde_json::from_str(&to_json(&data).unwrap()).unwrap();

    assert_eq!(
        value,
        json!({ "items": [{ "text": "a", "checked": true, "level": 1 }] })
    );
}

#[test]
fn export_joins_item_text() {
    let mut model = ChecklistModel::empty();
    model.push(RichText::from_markup("a"), false, 0);
    model.push(RichText::from_markup("<b>b</b>"), true, 1);

    assert_eq!(export_plain_text(&model), "a. <b>b</b>");
}

#[test]
fn import_creates_single_item() {
    let model = import_plain_text("hello");

    assert_eq!(summary(&model), vec![("hello".to_string(), false, 0)]);
}

#[test]
fn import_keeps_markup_characters_as_text() {
    for source in ["1 < 2 & 3", "a<b>b", "<strong>x</strong>"] {
        let model = import_plain_text(source);
        let item = &model.items()[0];

        assert_eq!(model.len(), 1);
        assert_eq!(item.content.plain_text(), source);
        assert_eq!(RichText::from_markup(&item.text()), item.content);
    }
    assert_eq!(
        import_plain_text("1 < 2 & 3").items()[0].text(),
        "1 &lt; 2 &amp; 3"
    );
}
