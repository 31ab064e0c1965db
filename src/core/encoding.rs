//! Input Encoding Detection
//!
//! SVG files exported by editors arrive as UTF-8 (with or without BOM) and
//! occasionally as UTF-16. Everything downstream works on `&str`, so raw
//! file bytes are decoded here first.

/// Encoding detected from byte order mark or initial byte pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }

    /// Length of the byte order mark for this encoding, if `input` carries one
    fn bom_len(self, input: &[u8]) -> usize {
        let bom: &[u8] = match self {
            XmlEncoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            XmlEncoding::Utf16Le => &[0xFF, 0xFE],
            XmlEncoding::Utf16Be => &[0xFE, 0xFF],
        };
        if input.starts_with(bom) { bom.len() } else { 0 }
    }
}

/// Decode raw document bytes into a UTF-8 string, dropping any BOM
pub fn decode_to_string(input: Vec<u8>) -> Result<String, String> {
    let encoding = XmlEncoding::detect(&input);
    let skip = encoding.bom_len(&input);

    match encoding {
        XmlEncoding::Utf8 => {
            let bytes = if skip == 0 { input } else { input[skip..].to_vec() };
            String::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8: {}", e))
        }
        XmlEncoding::Utf16Le => decode_utf16(&input[skip..], u16::from_le_bytes, "UTF-16 LE"),
        XmlEncoding::Utf16Be => decode_utf16(&input[skip..], u16::from_be_bytes, "UTF-16 BE"),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16, label: &str) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("Invalid {}: odd number of bytes", label));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|e| format!("Invalid {}: {}", label, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(XmlEncoding::detect(b"<svg/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xEF, 0xBB, 0xBF, b'<']), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(&[0xFF, 0xFE, b'<', 0x00]), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&[0x00, b'<', 0x00, b'g']), XmlEncoding::Utf16Be);
    }

    #[test]
    fn test_utf8_bom_dropped() {
        let input = [&[0xEF, 0xBB, 0xBF][..], b"<svg/>"].concat();
        assert_eq!(decode_to_string(input).unwrap(), "<svg/>");
    }

    #[test]
    fn test_utf16_le() {
        let mut input = vec![0xFF, 0xFE];
        for b in b"<g/>" {
            input.extend_from_slice(&[*b, 0x00]);
        }
        assert_eq!(decode_to_string(input).unwrap(), "<g/>");
    }

    #[test]
    fn test_utf16_be_without_bom() {
        let mut input = Vec::new();
        for b in b"<g/>" {
            input.extend_from_slice(&[0x00, *b]);
        }
        assert_eq!(decode_to_string(input).unwrap(), "<g/>");
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(decode_to_string(vec![b'<', 0xC3, 0x28]).is_err());
        assert!(decode_to_string(vec![0xFF, 0xFE, b'<']).is_err());
    }
}
