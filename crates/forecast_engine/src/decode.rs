use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the body a `<meta>` charset declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    /// Canonical encoding name, e.g. `windows-1252`.
    pub encoding: &'static str,
    pub source: EncodingSource,
}

/// Where the encoding decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    ByteOrderMark,
    ContentType,
    MetaTag,
    Detected,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("body is not valid {encoding}")]
    Malformed { encoding: &'static str },
}

/// Turn the downloaded body into text.
///
/// Order of precedence: BOM, `Content-Type` charset, `<meta>` charset in the
/// first kilobyte, then statistical detection.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, DecodeError> {
    let (encoding, source) = choose_encoding(bytes, content_type);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name(),
        });
    }
    Ok(DecodedPage {
        text: text.into_owned(),
        encoding: encoding.name(),
        source,
    })
}

fn choose_encoding(
    bytes: &[u8],
    content_type: Option<&str>,
) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return (encoding, EncodingSource::ByteOrderMark);
    }

    let from_header = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = from_header {
        return (encoding, EncodingSource::ContentType);
    }

    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    if let Some(encoding) = meta_charset(head).and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return (encoding, EncodingSource::MetaTag);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    (detector.guess(None, true), EncodingSource::Detected)
}

/// `charset=` value of a `Content-Type` header, case-insensitive, unquoted.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Covers both `<meta charset=...>` and the `http-equiv` form, whose content
/// attribute carries a full `Content-Type` value. Only text inside a `<meta`
/// tag is looked at.
fn meta_charset(head: &[u8]) -> Option<String> {
    let ascii: String = head
        .iter()
        .map(|&b| if b.is_ascii() { b.to_ascii_lowercase() as char } else { ' ' })
        .collect();

    let mut rest = ascii.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start + "<meta".len()..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(label) = tag.find("charset=").and_then(|at| charset_label(&tag[at..])) {
            return Some(label);
        }
        rest = &rest[start + "<meta".len()..];
    }
    None
}

fn charset_label(attr: &str) -> Option<String> {
    let value = attr["charset=".len()..].trim_start_matches(['"', '\'']);
    let label: String = value
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_param_handles_case_and_quotes() {
        assert_eq!(
            charset_param("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_param("text/html"), None);
        assert_eq!(charset_param("text/html; charset="), None);
    }

    #[test]
    fn meta_charset_reads_http_equiv_form() {
        let head = br#"<meta http-equiv=Content-Type content="text/html; charset=windows-1252">"#;
        assert_eq!(meta_charset(head), Some("windows-1252".to_string()));
        assert_eq!(meta_charset(b"<meta charset='utf-8'>"), Some("utf-8".to_string()));
        assert_eq!(meta_charset(b"<html></html>"), None);
    }

    #[test]
    fn meta_charset_ignores_text_outside_meta_tags() {
        let head = b"<title>charset=koi8-r</title><meta name=viewport content=x>\
                     <meta charset=windows-1252>";
        assert_eq!(meta_charset(head), Some("windows-1252".to_string()));
        assert_eq!(meta_charset(b"<p>charset=koi8-r</p>"), None);
    }
}
