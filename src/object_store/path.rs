/// Object path layout: `{category}/{reportId}/{timestamp}.{ext}`
use crate::{
    error::{PetError, PetResult},
    ids::ReportId,
};

/// Build the storage path for one image of one report.
///
/// The report id keeps reports apart; the millisecond timestamp keeps
/// several images of the same report apart.
pub fn object_path(category: &str, id: &ReportId, timestamp_millis: i64, ext: &str) -> String {
    format!("{}/{}/{}.{}", category, id, timestamp_millis, ext)
}

/// File extension for an upload: taken from the declared file name when it
/// has one, otherwise derived from the content type.
pub fn extension_for(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    if let Some(ext) = from_name {
        return ext;
    }

    match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
    .to_string()
}

/// Reject paths that could escape the store root
pub fn validate_path(path: &str) -> PetResult<()> {
    if path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains('\0')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(PetError::Validation(format!("Invalid object path: {}", path)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_layout() {
        let id: ReportId = "6f1c1e2a-9a57-4d7c-8a50-0f3f0a9d1b2c".parse().unwrap();
        assert_eq!(
            object_path("found-pets", &id, 1700000000000, "jpg"),
            "found-pets/6f1c1e2a-9a57-4d7c-8a50-0f3f0a9d1b2c/1700000000000.jpg"
        );
    }

    #[test]
    fn test_extension_from_file_name() {
        assert_eq!(extension_for(Some("dog.JPG"), "image/jpeg"), "jpg");
        assert_eq!(extension_for(Some("cat.photo.png"), "image/jpeg"), "png");
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(extension_for(Some("noext"), "image/png"), "png");
        assert_eq!(extension_for(None, "image/webp"), "webp");
        assert_eq!(extension_for(None, "application/octet-stream"), "jpg");
        assert_eq!(extension_for(Some("weird.p/g"), "image/gif"), "gif");
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("lost-pets/abc/1.jpg").is_ok());
        assert!(validate_path("../etc/passwd").is_err());
        assert!(validate_path("/abs/path").is_err());
        assert!(validate_path("a//b").is_err());
        assert!(validate_path("a\\b").is_err());
        assert!(validate_path("").is_err());
    }
}
