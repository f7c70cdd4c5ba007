/// Prefix a declared content type must have for the attachment to count as an image.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image";

/// `true` if at least one of the declared attachment content types is an image type.
/// Attachments without a declared type never count.
pub fn is_image_bearing<'a>(content_types: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    content_types
        .into_iter()
        .flatten()
        .any(|x| x.starts_with(IMAGE_CONTENT_TYPE_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::is_image_bearing;

    #[test]
    fn images_qualify() {
        assert!(is_image_bearing([Some("image/png")]));
        assert!(is_image_bearing([Some("image/jpeg")]));
        assert!(is_image_bearing([Some("image/gif"), Some("video/mp4")]));
        assert!(is_image_bearing([None, Some("text/plain"), Some("image/webp")]));
    }

    #[test]
    fn everything_else_does_not() {
        assert!(!is_image_bearing(Vec::<Option<&str>>::new()));
        assert!(!is_image_bearing([None]));
        assert!(!is_image_bearing([None, None]));
        assert!(!is_image_bearing([Some("video/mp4")]));
        assert!(!is_image_bearing([Some("application/pdf"), Some("text/plain")]));
        assert!(!is_image_bearing([Some("")]));
        // Prefix match is case-sensitive, same as what Discord sends.
        assert!(!is_image_bearing([Some("IMAGE/PNG")]));
    }
}
