//! Integration tests for the file-backed store and repositories.
//!
//! Exercises the full write/read cycle through real files in a temp dir.

use serde_json::json;

use widgetdash_core::settings::{SettingChange, Settings};
use widgetdash_core::widget::{FieldType, Widget, WidgetData, WidgetField};
use widgetdash_db::repositories::{SettingsRepo, WidgetRepo};
use widgetdash_db::{open_store, KeyValueStore, WIDGETS_KEY};

fn sample_widgets() -> Vec<Widget> {
    let base = Widget {
        id: "1700000000000".to_string(),
        title: "Weather".to_string(),
        api_url: "https://example.com/weather".to_string(),
        refresh_interval: 300,
        background_color: "#3B82F6".to_string(),
        text_color: "#ffffff".to_string(),
        fields: vec![WidgetField {
            id: "f1".to_string(),
            label: "Temperature".to_string(),
            key: "temp".to_string(),
            field_type: FieldType::Number,
        }],
        data: WidgetData::Loading,
        last_updated: None,
    };

    vec![
        base.clone(),
        Widget {
            id: "2".to_string(),
            title: "Quote".to_string(),
            data: WidgetData::Text("plain body".to_string()),
            last_updated: Some("10:00:00 AM".to_string()),
            ..base.clone()
        },
        Widget {
            id: "3".to_string(),
            title: "Broken".to_string(),
            data: WidgetData::error("Couldn't fetch data"),
            last_updated: Some("10:00:01 AM".to_string()),
            ..base.clone()
        },
        Widget {
            id: "4".to_string(),
            title: "Nested".to_string(),
            data: WidgetData::Json(json!({"z": [1, 2, {"a": null}], "b": 1.5})),
            last_updated: Some("10:00:02 AM".to_string()),
            ..base
        },
    ]
}

#[tokio::test]
async fn widgets_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    let widgets = sample_widgets();
    WidgetRepo::save_all(store.as_ref(), &widgets).await.unwrap();

    // A fresh handle over the same directory sees the same collection.
    let reopened = open_store(dir.path());
    assert_eq!(WidgetRepo::list(reopened.as_ref()).await, widgets);
}

#[tokio::test]
async fn stored_format_uses_camel_case_property_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    WidgetRepo::save_all(store.as_ref(), &sample_widgets()).await.unwrap();

    let raw = store.get(WIDGETS_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["apiUrl"], "https://example.com/weather");
    assert_eq!(value[0]["fields"][0]["type"], "number");
    assert!(value[0].get("data").is_none());
    assert_eq!(value[2]["data"]["error"], "Couldn't fetch data");
    assert_eq!(value[1]["data"], "plain body");
}

#[tokio::test]
async fn settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    SettingsRepo::update(store.as_ref(), SettingChange::AutoRefresh(false))
        .await
        .unwrap();

    let reopened = open_store(dir.path());
    assert_eq!(
        SettingsRepo::load(reopened.as_ref()).await,
        Settings {
            auto_refresh: false,
            ..Settings::default()
        }
    );
}

#[tokio::test]
async fn theme_toggle_blob_written_alone_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{"darkMode":true}"#).unwrap();

    let store = open_store(dir.path());
    let settings = SettingsRepo::load(store.as_ref()).await;
    assert!(settings.dark_mode);
    assert!(settings.auto_refresh);
}
