use configuration::Encoding;

/// Byte order mark some tools prepend to UTF-8 exports.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes raw file content.
///
/// ISO-8859-1 maps every byte to the code point of the same value, so it never
/// fails. UTF-8 input must be valid; on error the offset of the first bad byte
/// is returned.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<String, usize> {
    match encoding {
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        Encoding::Utf8 => {
            let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| e.valid_up_to())
        }
    }
}
