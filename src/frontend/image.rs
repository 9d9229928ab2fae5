use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{debug, warn};
use url::Url;

/// Media type and bytes of a base64 `data:` url.
fn decode(url: &Url) -> Option<(&str, Vec<u8>)> {
    if url.scheme() != "data" {
        return None;
    }

    let (mime, data) = url.path().split_once(";base64,")?;
    let bytes = base64::prelude::BASE64_STANDARD.decode(data).ok()?;

    Some((mime, bytes))
}

fn extension(mime: &str) -> &str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Writes the round's image under `dir`. Failures only cost the picture.
pub async fn save(dir: &Path, round: u32, url: &Url) -> Option<PathBuf> {
    let Some((mime, bytes)) = decode(url) else {
        warn!(scheme = url.scheme(), "dish image isn't a base64 data url");
        return None;
    };

    let path = dir.join(format!("round-{round:02}.{}", extension(mime)));

    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await
    };

    match written.await {
        Ok(()) => {
            debug!(path = %path.display(), "saved dish image");
            Some(path)
        }
        Err(err) => {
            warn!(%err, path = %path.display(), "couldn't save dish image");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, extension};
    use pretty_assertions::assert_eq;
    use url::Url;

    #[test]
    fn decodes_png_data_url() {
        let url = Url::parse("data:image/png;base64,aGVsbG8=").unwrap();
        let (mime, bytes) = decode(&url).unwrap();

        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
        assert_eq!(extension(mime), "png");
    }

    #[test]
    fn rejects_other_urls() {
        let url = Url::parse("https://example.com/ramen.png").unwrap();
        assert!(decode(&url).is_none());

        let url = Url::parse("data:image/png;base64,not base64!").unwrap();
        assert!(decode(&url).is_none());
    }
}
