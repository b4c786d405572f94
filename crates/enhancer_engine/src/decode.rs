use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use enhancer_logging::enhancer_warn;

/// How far into the body a `<meta charset>` declaration is looked for.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding: &'static str,
}

/// Decodes a response body to UTF-8.
///
/// Encoding is chosen from the BOM, then the `Content-Type` charset, then a `<meta>` charset
/// near the start of the body, then `chardetng` guessing. Malformed sequences become U+FFFD.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(header_charset))
        .or_else(|| meta_charset(bytes))
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        enhancer_warn!("body is not valid {}; malformed bytes replaced", used.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding: used.name(),
    }
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(['"', '\'']).as_bytes())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let lowered = head.to_ascii_lowercase();
    let needle = b"charset=";
    let start = lowered
        .windows(needle.len())
        .position(|window| window == needle)?
        + needle.len();
    let label: Vec<u8> = lowered[start..]
        .iter()
        .copied()
        .skip_while(|b| *b == b'"' || *b == b'\'')
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
        .collect();
    Encoding::for_label(&label)
}
