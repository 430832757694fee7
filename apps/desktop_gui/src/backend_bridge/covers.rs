//! Cover downloads and decoding, done off the UI thread.

/// Longest edge of a decoded cover thumbnail, in pixels.
pub const COVER_THUMBNAIL_EDGE: u32 = 320;

#[derive(Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for CoverImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

pub async fn fetch_cover(http: &reqwest::Client, url: &str) -> Result<CoverImage, String> {
    let bytes = http
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| err.without_url().to_string())?
        .bytes()
        .await
        .map_err(|err| err.without_url().to_string())?;
    decode_cover_image(&bytes)
}

pub fn decode_cover_image(bytes: &[u8]) -> Result<CoverImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(COVER_THUMBNAIL_EDGE, COVER_THUMBNAIL_EDGE)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(CoverImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
