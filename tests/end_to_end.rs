//! Host-level behaviour: configure a host, then save records through it.
//!
//! Everything here goes through the public API only, the way a CMS would
//! wire the plugin in.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use std::io::Cursor;
use upload_blurhash::host::{
    CollectionConfig, Field, HostConfig, Record, Request, UploadedFile,
};
use upload_blurhash::{BlurhashPlugin, PLACEHOLDER_FIELD, PlaceholderError, PluginConfig};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn host() -> HostConfig {
    serde_json::from_value(json!({
        "serverURL": "http://localhost:3000",
        "collections": [
            { "slug": "users", "auth": true, "fields": [{ "name": "email", "type": "email" }] },
            {
                "slug": "media",
                "upload": { "staticDir": "media", "mimeTypes": ["image/*", "application/pdf"] },
                "fields": [{ "name": "alt", "type": "text", "required": true }]
            },
            { "slug": "avatars", "upload": true },
            {
                "slug": "docs",
                "fields": [
                    { "name": "summary", "type": "textarea", "admin": { "position": "sidebar" } },
                    {
                        "type": "row",
                        "fields": [
                            { "name": "title", "type": "text" },
                            { "name": "slug", "type": "text", "admin": { "readOnly": true } }
                        ]
                    }
                ]
            }
        ]
    }))
    .unwrap()
}

fn record(mime_type: &str) -> Record {
    match json!({ "filename": "upload", "mimeType": mime_type, "alt": "x" }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn request(bytes: Vec<u8>, mime_type: &str) -> Request {
    Request::with_file(UploadedFile::buffered("upload", mime_type, bytes))
}

fn serialized(config: &HostConfig, slug: &str) -> Value {
    serde_json::to_value(config.collection(slug).unwrap()).unwrap()
}

#[test]
fn media_only_config_extends_only_media() {
    let before = host();
    let plugin = BlurhashPlugin::new(
        PluginConfig::from_json(json!({ "collections": ["media"] })).unwrap(),
    )
    .unwrap();
    let after = plugin.apply(&before);

    let media_before = before.collection("media").unwrap();
    let media_after = after.collection("media").unwrap();
    assert_eq!(media_after.fields().len(), media_before.fields().len() + 1);
    assert_eq!(media_after.fields().last(), Some(&Field::hidden_text(PLACEHOLDER_FIELD)));
    assert_eq!(
        media_after.hooks.before_change.len(),
        media_before.hooks.before_change.len() + 1
    );

    for slug in ["users", "avatars", "docs"] {
        assert_eq!(serialized(&after, slug), serialized(&before, slug), "{slug} changed");
        assert!(after.collection(slug).unwrap().hooks.before_change.is_empty());
    }
    assert_eq!(after.extra, before.extra);
}

#[test]
fn default_config_extends_upload_collections_only() {
    let before = host();
    let after = BlurhashPlugin::new(PluginConfig::default())
        .unwrap()
        .apply(&before);

    for slug in ["media", "avatars"] {
        let fields = after.collection(slug).unwrap().fields();
        assert_eq!(fields.last(), Some(&Field::hidden_text(PLACEHOLDER_FIELD)), "{slug}");
    }
    assert_eq!(
        serialized(&after, "media")["upload"],
        serialized(&before, "media")["upload"]
    );
    for slug in ["users", "docs"] {
        assert_eq!(serialized(&after, slug), serialized(&before, slug), "{slug} changed");
    }
}

#[test]
fn saving_an_image_stores_a_blurhash() {
    let config = BlurhashPlugin::new(PluginConfig::default())
        .unwrap()
        .apply(&host());

    let saved = config
        .run_before_change("media", record("image/png"), &request(png_bytes(120, 80), "image/png"))
        .unwrap();

    let hash = saved[PLACEHOLDER_FIELD].as_str().unwrap();
    // 3x3 components: 4 header chars + 2 per component.
    assert_eq!(hash.len(), 22);
    let mut without = saved.clone();
    without.remove(PLACEHOLDER_FIELD);
    assert_eq!(without, record("image/png"));
}

#[test]
fn saving_with_thumbhash_stores_base64() {
    let config = BlurhashPlugin::new(
        PluginConfig::from_toml_str("algorithm = \"thumbhash\"\n").unwrap(),
    )
    .unwrap()
    .apply(&host());

    let saved = config
        .run_before_change("avatars", record("image/png"), &request(png_bytes(300, 200), "image/png"))
        .unwrap();
    let hash = saved[PLACEHOLDER_FIELD].as_str().unwrap();
    assert!(!hash.is_empty());
    assert!(
        hash.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
    );
}

#[test]
fn saving_a_document_leaves_the_record_alone() {
    let config = BlurhashPlugin::new(PluginConfig::default())
        .unwrap()
        .apply(&host());

    let data = record("application/pdf");
    let saved = config
        .run_before_change("media", data.clone(), &request(b"%PDF-1.7".to_vec(), "application/pdf"))
        .unwrap();
    assert_eq!(saved, data);
}

#[test]
fn corrupt_image_aborts_the_save() {
    let config = BlurhashPlugin::new(PluginConfig::default())
        .unwrap()
        .apply(&host());

    let mut bytes = png_bytes(40, 40);
    bytes.truncate(30);
    let err = config
        .run_before_change("media", record("image/png"), &request(bytes, "image/png"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlaceholderError>(),
        Some(PlaceholderError::InvalidImage(_))
    ));
}

#[test]
fn untouched_collections_save_as_before() {
    let config = BlurhashPlugin::new(PluginConfig::default())
        .unwrap()
        .apply(&host());

    let data = record("image/png");
    let saved = config
        .run_before_change("users", data.clone(), &request(png_bytes(8, 8), "image/png"))
        .unwrap();
    assert_eq!(saved, data);
}

#[test]
fn hand_built_collections_work_too() {
    let host = HostConfig {
        collections: vec![CollectionConfig::new("photos").with_upload()],
        ..HostConfig::default()
    };
    let config = BlurhashPlugin::new(
        PluginConfig::from_json(json!({ "componentX": 5, "componentY": 4 })).unwrap(),
    )
    .unwrap()
    .apply(&host);

    let saved = config
        .run_before_change("photos", record("image/png"), &request(png_bytes(64, 64), "image/png"))
        .unwrap();
    assert_eq!(saved[PLACEHOLDER_FIELD].as_str().map(str::len), Some(4 + 2 * 20));
}
