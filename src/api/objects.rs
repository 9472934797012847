/// Serving of stored images by object path
///
/// Disk-backed deployments hand out `/objects/{path}` URLs; this route
/// resolves them. Objects are write-once, so responses are cacheable.
use crate::{
    context::AppContext,
    error::{PetError, PetResult},
};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

/// Build object routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/objects/*path", get(get_object))
}

async fn get_object(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
) -> PetResult<impl IntoResponse> {
    let data = ctx
        .objects
        .get(&path)
        .await?
        .ok_or_else(|| PetError::NotFound(format!("Object not found: {}", path)))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&path)),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        data,
    ))
}

/// Content type from the stored file's extension
fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("found-pets/abc/1700000000000.jpg"), "image/jpeg");
        assert_eq!(content_type_for("lost-pets/abc/1.PNG"), "image/png");
        assert_eq!(content_type_for("lost-pets/abc/1.webp"), "image/webp");
        assert_eq!(content_type_for("lost-pets/abc/noext"), "application/octet-stream");
    }
}
