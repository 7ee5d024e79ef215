/// Parse a channel reference given as a raw id or a `<#id>` mention.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return (id != 0).then_some(id);
    }

    raw.strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .and_then(|id| id.parse::<u64>().ok())
        .filter(|id| *id != 0)
}

/// Parse a non-negative whole number, rejecting signs other than a leading `+`.
pub fn parse_non_negative(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_channel_id, parse_non_negative};

    #[test]
    fn channel_ids_from_ids_and_mentions() {
        assert_eq!(parse_channel_id("123456789"), Some(123456789));
        assert_eq!(parse_channel_id(" <#42> "), Some(42));
        assert_eq!(parse_channel_id("<#abc>"), None);
        assert_eq!(parse_channel_id("<@42>"), None);
        assert_eq!(parse_channel_id("0"), None);
        assert_eq!(parse_channel_id(""), None);
    }

    #[test]
    fn non_negative_numbers() {
        assert_eq!(parse_non_negative("50"), Some(50));
        assert_eq!(parse_non_negative(" +7 "), Some(7));
        assert_eq!(parse_non_negative("0"), Some(0));
        assert_eq!(parse_non_negative("-5"), None);
        assert_eq!(parse_non_negative("4.5"), None);
        assert_eq!(parse_non_negative("ten"), None);
        assert_eq!(parse_non_negative("+"), None);
    }
}
