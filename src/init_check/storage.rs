//! Object storage upload probe.

use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/_init/s3/test-s3
///
/// Minimal browser-drivable form so the probe can be exercised by hand.
pub async fn upload_form() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
  <body>
    <form action="/api/_init/s3/test-s3" method="post" enctype="multipart/form-data">
      <input type="file" name="file" />
      <button type="submit">Upload</button>
    </form>
  </body>
</html>
"#,
    )
}

/// POST /api/_init/s3/test-s3
///
/// Stores the uploaded file privately under the configured prefix and
/// answers with a short-lived presigned download URL, proving both write
/// and read credentials work.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let Some(storage) = state.storage.as_ref() else {
        return Err(ApiError::StorageDisabled);
    };
    let config = &state.config.storage;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
            file = Some((file_name, content_type, bytes));
            break;
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Err(ApiError::Unprocessable("The file field is required.".to_string()));
    };
    if bytes.len() > config.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    let key = object_key(&config.key_prefix, file_name.as_deref());
    storage.put_object(&key, bytes.to_vec(), content_type).await?;

    let url = storage
        .presign_get(&key, Duration::from_secs(config.presign_expiry_secs))
        .await?;

    Ok(Json(json!({
        "message": format!("Uploaded successfully to: {key}"),
        "url": url,
    })))
}

/// Random object key under the prefix, keeping the client's extension
/// when it looks sane.
fn object_key(prefix: &str, file_name: Option<&str>) -> String {
    let id = Uuid::new_v4();
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 16 && ext.chars().all(char::is_alphanumeric));

    match extension {
        Some(ext) => format!("{prefix}/{id}.{ext}"),
        None => format!("{prefix}/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::object_key;

    #[test]
    fn object_key_keeps_sane_extensions() {
        let key = object_key("test-uploads", Some("report.pdf"));
        assert!(key.starts_with("test-uploads/"));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn object_key_drops_suspect_extensions() {
        for name in ["noext", "trailingdot.", "weird.ex/t?"] {
            let key = object_key("test-uploads", Some(name));
            assert_eq!(key.matches('.').count(), 0, "file name {name}");
        }
    }
}
