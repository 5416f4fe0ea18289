//! `application/x-www-form-urlencoded` encoding for POST bodies.

/// Encode key-value pairs as a form body: `key=value&key2=value2`.
pub fn encode_form(pairs: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            body.push('&');
        }
        body.push_str(&percent_encode(key));
        body.push('=');
        body.push_str(&percent_encode(value));
    }
    body
}

/// Percent-encode one form component. Space becomes `+`; multi-byte
/// characters are encoded byte by byte.
pub fn percent_encode(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut result = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                result.push(b as char)
            }
            b' ' => result.push('+'),
            _ => {
                result.push('%');
                result.push(HEX[(b >> 4) as usize] as char);
                result.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    result
}
