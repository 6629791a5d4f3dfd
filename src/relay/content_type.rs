//! Response content type from the request path's extension.
//!
//! The codec output is the other format: a JPEG request comes back Lepton
//! encoded, a `.lep` request comes back as a JPEG.

pub const IMAGE_LEPTON: &str = "image/lepton";
pub const IMAGE_JPEG: &str = "image/jpeg";

/// `None` means the response carries no `Content-Type` header.
///
/// Extensions are matched case-sensitively.
pub fn content_type_for(path: &str) -> Option<&'static str> {
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        Some(IMAGE_LEPTON)
    } else if path.ends_with(".lep") {
        Some(IMAGE_JPEG)
    } else {
        None
    }
}
