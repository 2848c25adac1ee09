//! Lamport/SOL conversions for display and input parsing

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Render lamports as SOL with between 2 and 4 decimals ("1.50", "0.1235")
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let frac = lamports % LAMPORTS_PER_SOL;

    // Round half-up to 4 decimals
    let mut ten_thousandths = (frac + 50_000) / 100_000;
    let mut whole = whole as u128;
    if ten_thousandths == 10_000 {
        whole += 1;
        ten_thousandths = 0;
    }

    let mut decimals = format!("{:04}", ten_thousandths);
    while decimals.len() > 2 && decimals.ends_with('0') {
        decimals.pop();
    }
    format!("{}.{}", whole, decimals)
}

/// Parse a decimal SOL amount into lamports, truncating past 9 decimals
pub fn parse_sol_to_lamports(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac_digits: String = frac.chars().take(9).collect();
    let frac_lamports = if frac_digits.is_empty() {
        0
    } else {
        let scale = 10u64.pow(9 - frac_digits.len() as u32);
        frac_digits.parse::<u64>().ok()? * scale
    };

    whole.checked_mul(LAMPORTS_PER_SOL)?.checked_add(frac_lamports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_to_four_decimals() {
        assert_eq!(format_sol(0), "0.00");
        assert_eq!(format_sol(1_500_000_000), "1.50");
        assert_eq!(format_sol(10 * LAMPORTS_PER_SOL), "10.00");
        assert_eq!(format_sol(123_456_789), "0.1235");
        assert_eq!(format_sol(100_000), "0.0001");
        assert_eq!(format_sol(1_999_990_000), "2.00");
    }

    #[test]
    fn parses_decimal_sol() {
        assert_eq!(parse_sol_to_lamports("1.5"), Some(1_500_000_000));
        assert_eq!(parse_sol_to_lamports("10"), Some(10_000_000_000));
        assert_eq!(parse_sol_to_lamports(".25"), Some(250_000_000));
        assert_eq!(parse_sol_to_lamports("0.000000001"), Some(1));
        assert_eq!(parse_sol_to_lamports("0.0000000019"), Some(1));
        assert_eq!(parse_sol_to_lamports(" 2 "), Some(2_000_000_000));
    }

    #[test]
    fn rejects_invalid_input() {
        for input in ["", ".", "-1", "abc", "1.2.3", "1e9", "18446744074"] {
            assert_eq!(parse_sol_to_lamports(input), None, "{:?}", input);
        }
    }
}
