//! Canonical hash input for blocks.
//!
//! The preimage is the plain concatenation `index ++ timestamp ++ data ++ prev_hash ++ nonce`,
//! where `timestamp` and `data` are rendered as Python-style literals
//! (`['hello']`, `1700000000.0`, `{'to': 'bob', 'ok': True}`). Changing any separator,
//! quote or float rendering changes every digest, so keep the known-answer tests green.

use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 over the canonical form of a block's fields.
pub fn digest(index: u64, timestamp: f64, data: &[Value], prev_hash: &str, nonce: u64) -> String {
    let preimage = canonical_form(index, timestamp, data, prev_hash, nonce);
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}

/// The exact string that gets hashed.
pub fn canonical_form(
    index: u64,
    timestamp: f64,
    data: &[Value],
    prev_hash: &str,
    nonce: u64,
) -> String {
    let mut out = String::with_capacity(64 + prev_hash.len());
    out.push_str(&index.to_string());
    out.push_str(&render_float(timestamp));
    render_list(data, &mut out);
    out.push_str(prev_hash);
    out.push_str(&nonce.to_string());
    out
}

/// Shortest round-trip float text: always keeps a fractional part (`1.0`) and
/// switches to exponent form outside `1e-4 <= |x| < 1e16` (`1e+16`, `1.5e-05`).
pub fn render_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sign = if x.is_sign_negative() { "-" } else { "" };
    // `{:e}` gives the shortest digits that round-trip, e.g. `1.700000123456789e9`.
    let sci = format!("{:e}", x.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let decpt = exponent + 1;

    let body = if decpt <= -4 || decpt > 16 {
        let (head, tail) = digits.split_at(1);
        let exp = decpt - 1;
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if tail.is_empty() {
            format!("{head}e{exp_sign}{:02}", exp.abs())
        } else {
            format!("{head}.{tail}e{exp_sign}{:02}", exp.abs())
        }
    } else if decpt <= 0 {
        format!("0.{}{digits}", "0".repeat(decpt.unsigned_abs() as usize))
    } else {
        let decpt = decpt as usize;
        if decpt >= digits.len() {
            format!("{digits}{}.0", "0".repeat(decpt - digits.len()))
        } else {
            let (int, frac) = digits.split_at(decpt);
            format!("{int}.{frac}")
        }
    };
    format!("{sign}{body}")
}

fn render_list(items: &[Value], out: &mut String) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render_value(item, out);
    }
    out.push(']');
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&render_number(n)),
        Value::String(s) => render_str(s, out),
        Value::Array(items) => render_list(items, out),
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_str(key, out);
                out.push_str(": ");
                render_value(item, out);
            }
            out.push('}');
        }
    }
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        render_float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Single quotes unless the text holds a `'` and no `"`; escapes backslashes,
/// the active quote, `\t` `\n` `\r` and non-printable characters.
fn render_str(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c => {
                let cp = c as u32;
                let escaped = if cp <= 0xff {
                    format!("\\x{cp:02x}")
                } else if cp <= 0xffff {
                    format!("\\u{cp:04x}")
                } else {
                    format!("\\U{cp:08x}")
                };
                out.push_str(&escaped);
            }
        }
    }
    out.push(quote);
}

// Approximates the Unicode "printable" class: control, separator (other than
// the ASCII space), format and private-use characters are escaped.
fn is_printable(c: char) -> bool {
    if c.is_ascii() {
        return c == ' ' || !c.is_ascii_control();
    }
    !(c.is_control()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{ad}'
                | '\u{600}'..='\u{605}'
                | '\u{200b}'..='\u{200f}'
                | '\u{202a}'..='\u{202e}'
                | '\u{2060}'..='\u{2064}'
                | '\u{feff}'
                | '\u{e000}'..='\u{f8ff}'
        ))
}

#[cfg(test)]
mod tests {
    use super::{canonical_form, digest, render_float};
    use serde_json::json;

    #[test]
    fn genesis_known_answer() {
        let data = vec![json!("Genesis Block")];
        assert_eq!(
            canonical_form(0, 1_700_000_000.5, &data, "0", 0),
            "01700000000.5['Genesis Block']00"
        );
        assert_eq!(
            digest(0, 1_700_000_000.5, &data, "0", 0),
            "0ace72a048f93539c11fbd77c95e90eecc0d9208e895bea7d13c9950726f9700"
        );
    }

    #[test]
    fn whole_timestamp_keeps_fraction() {
        let prev = "0".repeat(64);
        let data = vec![json!("hello")];
        assert_eq!(
            canonical_form(1, 1_700_000_000.0, &data, &prev, 0),
            format!("11700000000.0['hello']{prev}0")
        );
        assert_eq!(
            digest(1, 1_700_000_000.0, &data, &prev, 0),
            "8436c0ebb31b3b736bf60fe49fe10b3ae06ec6ec626d7766f3ccc20965b5a6de"
        );
    }

    #[test]
    fn structured_payload_known_answer() {
        let data = vec![json!({"to": "bob", "amount": 5, "ok": true, "memo": null})];
        assert_eq!(
            canonical_form(2, 1_700_000_123.456789, &data, "abc", 42),
            "21700000123.456789[{'to': 'bob', 'amount': 5, 'ok': True, 'memo': None}]abc42"
        );
        assert_eq!(
            digest(2, 1_700_000_123.456789, &data, "abc", 42),
            "0e3b5cecedd0c2b790ad08ca8e587ed130f5521850e54b01cfc46dcb1fa09b59"
        );
    }

    #[test]
    fn apostrophe_switches_to_double_quotes() {
        let data = vec![json!("it's")];
        assert_eq!(
            canonical_form(3, 1.5e-5, &data, "0", 7),
            "31.5e-05[\"it's\"]07"
        );
        assert_eq!(
            digest(3, 1.5e-5, &data, "0", 7),
            "8d1d52be2cc135ce6bef476c272a5e937ecaa057376fce9870517968e83843a8"
        );
    }

    #[test]
    fn float_rendering() {
        assert_eq!(render_float(0.0), "0.0");
        assert_eq!(render_float(-2.5), "-2.5");
        assert_eq!(render_float(1e16), "1e+16");
        assert_eq!(render_float(1e15), "1000000000000000.0");
        assert_eq!(render_float(1.5e-5), "1.5e-05");
        assert_eq!(render_float(1e-4), "0.0001");
        assert_eq!(render_float(123_456_789_012_345_680.0), "1.2345678901234568e+17");
        assert_eq!(render_float(f64::INFINITY), "inf");
    }

    #[test]
    fn string_escapes() {
        let data = vec![
            json!("a'b\"c"),
            json!("tab\there"),
            json!("back\\slash"),
            json!("\u{1}\u{7f}"),
            json!("é\u{a0}\u{2028}😀"),
        ];
        let form = canonical_form(0, 0.0, &data, "", 0);
        assert_eq!(
            form,
            r#"00.0['a\'b"c', 'tab\there', 'back\\slash', '\x01\x7f', 'é\xa0\u2028😀']0"#
        );
    }

    #[test]
    fn nested_lists_and_numbers() {
        let data = vec![json!([1, -2, 2.0, [], {}])];
        assert_eq!(
            canonical_form(0, 1.0, &data, "", 0),
            "01.0[[1, -2, 2.0, [], {}]]0"
        );
    }
}
