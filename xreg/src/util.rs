use xreg_format::{ValueRecord, ValueType};

/// Replaces bytes outside printable ASCII with `.`.
pub fn sanitize(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { '.' })
        .collect()
}

pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a value according to its type. Unknown types and malformed
/// slots are shown as hex.
pub fn format_value(value: &ValueRecord) -> String {
    match value.value_type {
        ValueType::Bool => value
            .as_bool()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".into()),
        ValueType::Integer => value
            .as_int()
            .map(|i| i.to_string())
            .unwrap_or_else(|| hex(value.data())),
        ValueType::String => value.as_text().map(sanitize).unwrap_or_default(),
        ValueType::Unknown(_) => hex(value.data()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(value_type: ValueType, data: &[u8]) -> ValueRecord {
        ValueRecord {
            file_offset: 0x10000,
            tag1: 0,
            key_offset: 0,
            tag2: 0,
            length: data.len() as u16,
            value_type,
            data: data.to_vec(),
        }
    }

    #[test]
    fn sanitize_replaces_unprintable() {
        assert_eq!(sanitize(b"8.8.8.8"), "8.8.8.8");
        assert_eq!(sanitize(b"a\x01b\x7fc\xff"), "a.b.c.");
    }

    #[test]
    fn format_by_type() {
        assert_eq!(format_value(&value(ValueType::Bool, &[1])), "true");
        assert_eq!(format_value(&value(ValueType::Integer, &[0, 0, 1, 0])), "256");
        assert_eq!(format_value(&value(ValueType::Integer, &[1, 2])), "01 02");
        assert_eq!(
            format_value(&value(ValueType::String, b"1.1\x02.1\0\0")),
            "1.1..1"
        );
        assert_eq!(format_value(&value(ValueType::Unknown(5), &[0xab])), "ab");
    }
}
