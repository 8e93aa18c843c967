use super::{DocumentFormat, ExtractionError, FormatDecoder};

/// Destinations whose content is never body text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "headerl",
    "headerr",
    "footerl",
    "footerr",
    "listtable",
    "listoverridetable",
    "generator",
    "themedata",
    "xmlnstbl",
];

/// Minimal RTF reader: walks groups and control words, keeps body text, maps
/// paragraph/line/tab controls to whitespace and decodes `\'hh` and `\uN` escapes.
pub struct RtfDecoder;

impl FormatDecoder for RtfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if !bytes.starts_with(b"{\\rtf") {
            return Err(ExtractionError::decode(
                DocumentFormat::Rtf,
                "missing {\\rtf header",
            ));
        }
        strip_rtf(bytes)
    }
}

#[derive(Clone, Copy, Default)]
struct GroupState {
    skip: bool,
    unicode_skip: usize,
}

fn strip_rtf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut out = String::new();
    let mut stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState {
        skip: false,
        unicode_skip: 1,
    };
    // Characters still to swallow after a \uN escape.
    let mut pending_fallback = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'{' => {
                stack.push(state);
                i += 1;
            }
            b'}' => {
                state = stack.pop().ok_or_else(|| {
                    ExtractionError::decode(DocumentFormat::Rtf, "unbalanced closing brace")
                })?;
                pending_fallback = 0;
                i += 1;
            }
            b'\\' => {
                i += 1;
                let Some(&next) = bytes.get(i) else { break };
                match next {
                    b'\\' | b'{' | b'}' => {
                        emit(&mut out, &state, &mut pending_fallback, next as char);
                        i += 1;
                    }
                    b'*' => {
                        state.skip = true;
                        i += 1;
                    }
                    b'\'' => {
                        let hex = bytes.get(i + 1..i + 3).and_then(|h| std::str::from_utf8(h).ok());
                        if let Some(code) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                            emit(&mut out, &state, &mut pending_fallback, ansi_char(code));
                        }
                        i += 3;
                    }
                    b'\n' | b'\r' => {
                        if !state.skip {
                            out.push('\n');
                        }
                        i += 1;
                    }
                    _ if next.is_ascii_alphabetic() => {
                        let start = i;
                        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                            i += 1;
                        }
                        let word = std::str::from_utf8(&bytes[start..i]).unwrap_or_default();

                        let num_start = i;
                        if i < bytes.len() && bytes[i] == b'-' {
                            i += 1;
                        }
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                        let param = std::str::from_utf8(&bytes[num_start..i])
                            .ok()
                            .and_then(|n| n.parse::<i32>().ok());
                        if i < bytes.len() && bytes[i] == b' ' {
                            i += 1;
                        }

                        apply_control(word, param, &mut state, &mut out, &mut pending_fallback);
                    }
                    _ => {
                        i += 1;
                    }
                }
            }
            b'\r' | b'\n' => {
                i += 1;
            }
            0x80.. => {
                // Raw high bytes: UTF-8 when the run is valid UTF-8, code page otherwise.
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b < 0x80)
                    .map_or(bytes.len(), |n| i + n);
                match std::str::from_utf8(&bytes[i..end]) {
                    Ok(run) => run
                        .chars()
                        .for_each(|c| emit(&mut out, &state, &mut pending_fallback, c)),
                    Err(_) => bytes[i..end]
                        .iter()
                        .for_each(|&b| emit(&mut out, &state, &mut pending_fallback, ansi_char(b))),
                }
                i = end;
            }
            _ => {
                emit(&mut out, &state, &mut pending_fallback, b as char);
                i += 1;
            }
        }
    }

    Ok(out
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string())
}

fn apply_control(
    word: &str,
    param: Option<i32>,
    state: &mut GroupState,
    out: &mut String,
    pending_fallback: &mut usize,
) {
    if SKIPPED_DESTINATIONS.contains(&word) {
        state.skip = true;
        return;
    }
    match word {
        "par" | "line" | "sect" | "page" => {
            if !state.skip {
                out.push('\n');
            }
        }
        "tab" | "cell" => {
            if !state.skip {
                out.push('\t');
            }
        }
        "row" => {
            if !state.skip {
                out.push('\n');
            }
        }
        "uc" => {
            state.unicode_skip = param.unwrap_or(1).max(0) as usize;
        }
        "u" => {
            if let Some(code) = param {
                // Code points above 32767 are written as negative numbers.
                let code = if code < 0 { code + 65536 } else { code };
                let code = u32::try_from(code).unwrap_or(0xFFFD);
                if !state.skip {
                    out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                }
                *pending_fallback = state.unicode_skip;
            }
        }
        _ => {}
    }
}

/// Windows-1252, the code page `\ansi` documents declare in practice. Bytes
/// outside 0x80..=0x9F coincide with Latin-1.
fn ansi_char(b: u8) -> char {
    const CP1252_HIGH: [u16; 32] = [
        0x20AC, 0x81, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160,
        0x2039, 0x0152, 0x8D, 0x017D, 0x8F, 0x90, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022,
        0x2013, 0x2014, 0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x9D, 0x017E, 0x0178,
    ];
    match b {
        0x80..=0x9F => {
            char::from_u32(u32::from(CP1252_HIGH[usize::from(b - 0x80)])).unwrap_or('\u{FFFD}')
        }
        _ => char::from(b),
    }
}

fn emit(out: &mut String, state: &GroupState, pending_fallback: &mut usize, c: char) {
    if *pending_fallback > 0 {
        *pending_fallback -= 1;
        return;
    }
    if !state.skip {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_text_survives_and_tables_are_skipped() {
        let rtf = br"{\rtf1\ansi{\fonttbl{\f0 Arial;}}{\colortbl;\red0\green0\blue0;}
\f0 Jane Doe\par
Senior Engineer at Acme Inc\par
Skills:\tab Rust, Python}";
        let text = RtfDecoder.decode(rtf).unwrap();
        assert!(!text.contains("Arial"));
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Senior Engineer at Acme Inc"));
        assert!(text.contains("Skills:\tRust, Python"));
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        let rtf = br"{\rtf1 Caf\'e9 \u8212? Z\u252?rich}";
        let text = RtfDecoder.decode(rtf).unwrap();
        assert_eq!(text, "Café \u{2014} Zürich");
    }

    #[test]
    fn test_windows_1252_hex_escapes() {
        let rtf = br"{\rtf1\ansi\ansicpg1252 Jane\'92s CV \'96 2024}";
        assert_eq!(RtfDecoder.decode(rtf).unwrap(), "Jane\u{2019}s CV \u{2013} 2024");
    }

    #[test]
    fn test_raw_utf8_bytes_are_not_mojibake() {
        let rtf = "{\\rtf1 Zürich \u{2014} São Paulo}".as_bytes();
        assert_eq!(RtfDecoder.decode(rtf).unwrap(), "Zürich \u{2014} São Paulo");
    }

    #[test]
    fn test_raw_single_high_byte_uses_code_page() {
        assert_eq!(RtfDecoder.decode(b"{\\rtf1 Caf\xe9}").unwrap(), "Caf\u{e9}");
    }

    #[test]
    fn test_ignorable_destination_is_skipped() {
        let rtf = br"{\rtf1 {\*\generator Riched20;}Visible}";
        assert_eq!(RtfDecoder.decode(rtf).unwrap(), "Visible");
    }

    #[test]
    fn test_missing_header_fails() {
        assert!(RtfDecoder.decode(b"plain").is_err());
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        assert!(RtfDecoder.decode(br"{\rtf1 text}}").is_err());
    }
}
