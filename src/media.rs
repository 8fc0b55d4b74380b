// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Image attachments for molts.
//!
//! Molts can carry a single image, uploaded alongside the text content as part of the same
//! request. [`MediaSource`] bundles the raw bytes with the filename and MIME type the server
//! sees; hand one to [`MoltDraft::media`][crate::MoltDraft::media] or
//! [`molt::edit`][crate::molt::edit] to attach it.

use std::path::Path;

use crate::error::Result;

/// An image to upload with a molt.
#[derive(Debug, Clone)]
pub struct MediaSource {
    /// The raw bytes of the image file.
    pub data: Vec<u8>,
    /// The filename reported to the server.
    pub filename: String,
    /// The MIME type of the image, guessed from the filename extension.
    pub mime: mime::Mime,
}

impl MediaSource {
    /// Creates a `MediaSource` from bytes already in memory.
    ///
    /// The MIME type is guessed from the extension of `filename`; unknown extensions fall back to
    /// `application/octet-stream`.
    pub fn from_bytes(data: Vec<u8>, filename: impl Into<String>) -> MediaSource {
        let filename = filename.into();
        let mime = mime_for_filename(&filename);
        MediaSource {
            data,
            filename,
            mime,
        }
    }

    /// Reads an image file from disk.
    ///
    /// This performs blocking IO; load the file ahead of time if that matters to your executor.
    pub fn from_file(path: impl AsRef<Path>) -> Result<MediaSource> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(MediaSource::from_bytes(data, filename))
    }
}

fn mime_for_filename(filename: &str) -> mime::Mime {
    let ext = filename
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(MediaSource::from_bytes(vec![], "a.jpg").mime, mime::IMAGE_JPEG);
        assert_eq!(MediaSource::from_bytes(vec![], "a.JPEG").mime, mime::IMAGE_JPEG);
        assert_eq!(MediaSource::from_bytes(vec![], "a.png").mime, mime::IMAGE_PNG);
        assert_eq!(MediaSource::from_bytes(vec![], "a.gif").mime, mime::IMAGE_GIF);
        assert_eq!(
            MediaSource::from_bytes(vec![], "mystery").mime,
            mime::APPLICATION_OCTET_STREAM
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match MediaSource::from_file("definitely/not/here.png") {
            Err(crate::error::Error::IOError(_)) => (),
            other => panic!("unexpected result: {:?}", other.map(|m| m.filename)),
        }
    }
}
