use super::{DocumentFormat, ExtractionError, FormatDecoder};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Strict UTF-8 decode. A leading BOM is dropped and CRLF line endings normalized.
pub struct PlainTextDecoder;

impl FormatDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::decode(DocumentFormat::Txt, e))?;
        Ok(text.replace("\r\n", "\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bom_and_crlf() {
        let text = PlainTextDecoder
            .decode(b"\xEF\xBB\xBFName\r\nEmail")
            .unwrap();
        assert_eq!(text, "Name\nEmail");
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let err = PlainTextDecoder.decode(&[0x66, 0xFF, 0xFE, 0x6F]).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DecodeError {
                format: DocumentFormat::Txt,
                ..
            }
        ));
    }
}
