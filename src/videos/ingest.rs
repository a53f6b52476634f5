//! Upload validation and content addressing for match videos.
//!
//! Uploads are accepted on what their bytes look like, never on the
//! extension the client claims. Accepted files are named after the SHA-256
//! of their content, so re-uploading the same match lands on the same file.

use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};
use std::fmt;

/// Shortest input that can carry any of the recognised signatures.
pub const MIN_HEADER_LEN: usize = 12;

/// Only this many leading bytes are inspected.
pub const HEADER_LEN: usize = 32;

const FTYP: &[u8; 4] = b"ftyp";
const QUICKTIME_BRAND: &[u8; 4] = b"qt  ";
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
const RIFF: &[u8; 4] = b"RIFF";
const AVI_FORM: &[u8; 4] = b"AVI ";
const MPEG_PACK_START: [u8; 4] = [0x00, 0x00, 0x01, 0xBA];
const MPEG_SEQUENCE_START: [u8; 4] = [0x00, 0x00, 0x01, 0xB3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoContainer {
    Mp4,
    Mov,
    WebM,
    Avi,
    Mpeg,
}

impl VideoContainer {
    /// Extension used for the stored file.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mov => "mov",
            Self::WebM => "webm",
            Self::Avi => "avi",
            Self::Mpeg => "mpg",
        }
    }
}

impl fmt::Display for VideoContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Identify the container format from the leading bytes of a file.
///
/// Returns `None` for anything outside the allowlist, including every
/// input shorter than [`MIN_HEADER_LEN`].
pub fn sniff_container(content: &[u8]) -> Option<VideoContainer> {
    if content.len() < MIN_HEADER_LEN {
        return None;
    }

    let header = &content[..content.len().min(HEADER_LEN)];

    // ISO-BMFF: the ftyp box type sits after a 4-byte size, occasionally
    // after an 8-byte one.
    for offset in [4, 8] {
        if header.len() > offset + 4 && &header[offset..offset + 4] == FTYP {
            let brand = header.get(offset + 4..offset + 8);
            if brand == Some(QUICKTIME_BRAND.as_slice()) {
                return Some(VideoContainer::Mov);
            }
            return Some(VideoContainer::Mp4);
        }
    }

    if header[..4] == EBML_MAGIC {
        return Some(VideoContainer::WebM);
    }

    if &header[..4] == RIFF && &header[8..12] == AVI_FORM {
        return Some(VideoContainer::Avi);
    }

    if header[..4] == MPEG_PACK_START || header[..4] == MPEG_SEQUENCE_START {
        return Some(VideoContainer::Mpeg);
    }

    None
}

/// Lowercase hex SHA-256 of the content.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// `YYYY/MM/DD` directory for videos of an event held on `date`.
pub fn date_partition(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// Storage path relative to the video root:
/// `<YYYY>/<MM>/<DD>/<sha256>.<ext>`.
pub fn storage_relative_path(date: NaiveDate, hash: &str, container: VideoContainer) -> String {
    format!(
        "{}/{}.{}",
        date_partition(date),
        hash,
        container.extension()
    )
}

/// Validated upload, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedVideo {
    pub container: VideoContainer,
    pub hash: String,
    pub relative_path: String,
}

/// Sniff and address an upload for an event held on `event_date`.
pub fn prepare_upload(content: &[u8], event_date: NaiveDate) -> Option<PreparedVideo> {
    let container = sniff_container(content)?;
    let hash = content_hash(content);
    let relative_path = storage_relative_path(event_date, &hash, container);
    Some(PreparedVideo {
        container,
        hash,
        relative_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ftyp_box(size_prefix: &[u8], brand: &[u8; 4]) -> Vec<u8> {
        let mut bytes = size_prefix.to_vec();
        bytes.extend_from_slice(FTYP);
        bytes.extend_from_slice(brand);
        bytes.extend_from_slice(&[0u8; 20]);
        bytes
    }

    #[rstest]
    #[case::quicktime_brand(b"qt  ", VideoContainer::Mov)]
    #[case::isom_brand(b"isom", VideoContainer::Mp4)]
    #[case::mp42_brand(b"mp42", VideoContainer::Mp4)]
    #[case::m4v_brand(b"M4V ", VideoContainer::Mp4)]
    fn test_ftyp_brand_decides_mov_or_mp4(
        #[case] brand: &[u8; 4],
        #[case] expected: VideoContainer,
    ) {
        let bytes = ftyp_box(&[0x00, 0x00, 0x00, 0x14], brand);
        assert_eq!(sniff_container(&bytes), Some(expected));
    }

    #[test]
    fn test_ftyp_at_offset_eight() {
        let bytes = ftyp_box(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18], b"qt  ");
        assert_eq!(sniff_container(&bytes), Some(VideoContainer::Mov));
    }

    #[rstest]
    #[case::webm(vec![0x1A, 0x45, 0xDF, 0xA3], VideoContainer::WebM)]
    #[case::mpeg_pack(vec![0x00, 0x00, 0x01, 0xBA], VideoContainer::Mpeg)]
    #[case::mpeg_sequence(vec![0x00, 0x00, 0x01, 0xB3], VideoContainer::Mpeg)]
    fn test_magic_prefixes(#[case] prefix: Vec<u8>, #[case] expected: VideoContainer) {
        let mut bytes = prefix;
        bytes.resize(64, 0);
        assert_eq!(sniff_container(&bytes), Some(expected));
    }

    #[test]
    fn test_riff_requires_avi_form_type() {
        let mut avi = b"RIFF\x00\x10\x00\x00AVI LIST".to_vec();
        avi.resize(32, 0);
        assert_eq!(sniff_container(&avi), Some(VideoContainer::Avi));

        let mut wav = b"RIFF\x00\x10\x00\x00WAVEfmt ".to_vec();
        wav.resize(32, 0);
        assert_eq!(sniff_container(&wav), None);
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::eleven_bytes(vec![0x00, 0x00, 0x00, 0x14, b'f', b't', b'y', b'p', b'q', b't', b' '])]
    #[case::short_ebml(vec![0x1A, 0x45, 0xDF, 0xA3])]
    fn test_short_input_is_rejected(#[case] bytes: Vec<u8>) {
        assert!(bytes.len() < MIN_HEADER_LEN);
        assert_eq!(sniff_container(&bytes), None);
    }

    #[rstest]
    #[case::png(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec())]
    #[case::text(b"definitely not a video file".to_vec())]
    #[case::zip(b"PK\x03\x04\x14\x00\x00\x00\x08\x00\x00\x00".to_vec())]
    fn test_unrecognised_content_is_rejected(#[case] bytes: Vec<u8>) {
        assert_eq!(sniff_container(&bytes), None);
    }

    #[test]
    fn test_only_header_is_inspected() {
        // A signature past the first 32 bytes does not count
        let mut bytes = vec![0xFFu8; 40];
        bytes.extend_from_slice(&EBML_MAGIC);
        assert_eq!(sniff_container(&bytes), None);
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash(b"abc").len(), 64);
    }

    #[test]
    fn test_storage_path_uses_event_date_and_hash() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_partition(date), "2024/03/09");
        assert_eq!(
            storage_relative_path(date, "abc123", VideoContainer::Mov),
            "2024/03/09/abc123.mov"
        );
    }

    #[test]
    fn test_prepare_upload_is_content_addressed() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        let bytes = ftyp_box(&[0x00, 0x00, 0x00, 0x20], b"isom");

        let first = prepare_upload(&bytes, date).unwrap();
        let second = prepare_upload(&bytes, date).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.container, VideoContainer::Mp4);
        assert_eq!(
            first.relative_path,
            format!("2025/11/30/{}.mp4", content_hash(&bytes))
        );

        assert!(prepare_upload(b"not a video at all", date).is_none());
    }
}
