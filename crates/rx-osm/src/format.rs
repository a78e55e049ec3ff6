//! Input format detection and decompression.
//!
//! All formats end up as a stream of [`Feature`]s handed to a caller-supplied
//! closure; compressed XML is decoded on the fly with `flate2` / `bzip2`.

use std::io::BufReader;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;

use crate::error::{OsmLoadingError, OsmResult};
use crate::feature::Feature;
use crate::options::FileFormat;
use crate::{pbf, xml};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// Guess the format of `data` from its first bytes.
///
/// | Format   | Signature                                                   |
/// |----------|-------------------------------------------------------------|
/// | `XmlGz`  | gzip magic `1f 8b`                                          |
/// | `XmlBz2` | `BZh`                                                       |
/// | `Pbf`    | 4-byte length, then a `BlobHeader` whose type is `OSMHeader` |
/// | `Xml`    | first non-blank byte is `<` (a UTF-8 BOM may precede it)    |
///
/// Returns `None` if nothing matches.
pub fn detect_format(data: &[u8]) -> Option<FileFormat> {
    if data.starts_with(GZIP_MAGIC) {
        return Some(FileFormat::XmlGz);
    }
    if data.starts_with(BZIP2_MAGIC) {
        return Some(FileFormat::XmlBz2);
    }
    if is_pbf(data) {
        return Some(FileFormat::Pbf);
    }

    let text = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match text.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'<') => Some(FileFormat::Xml),
        _ => None,
    }
}

/// `BlobHeader.type` is protobuf field 1 (tag `0x0a`), a 9-byte string.
fn is_pbf(data: &[u8]) -> bool {
    data.len() >= 15 && data[4] == 0x0a && data[5] == 9 && &data[6..15] == b"OSMHeader"
}

/// Decode `data` as `format` (detecting it first if `Unknown`), calling
/// `emit` for every feature in file order.
pub(crate) fn read_features<F: FnMut(Feature)>(data: &[u8], format: FileFormat, emit: F) -> OsmResult<()> {
    let format = match format {
        FileFormat::Unknown => detect_format(data).ok_or(OsmLoadingError::UnknownFormat)?,
        known => known,
    };
    log::debug!("reading {} bytes as {format:?}", data.len());

    match format {
        FileFormat::Xml => xml::read(data, emit),
        FileFormat::XmlGz => xml::read(BufReader::new(MultiGzDecoder::new(data)), emit),
        FileFormat::XmlBz2 => xml::read(BufReader::new(MultiBzDecoder::new(data)), emit),
        FileFormat::Pbf => pbf::read(data, emit),
        FileFormat::Unknown => Err(OsmLoadingError::UnknownFormat),
    }
}
