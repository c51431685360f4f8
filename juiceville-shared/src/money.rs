//! Money is carried as integer kobo (1/100 Naira) end to end, which is also
//! the unit the payment gateway charges in.

/// Amount in kobo.
pub type Kobo = i64;

pub const KOBO_PER_NAIRA: Kobo = 100;

/// Highest rate a single menu entry may carry: ₦99,999,999.99.
pub const MAX_RATE_KOBO: Kobo = 9_999_999_999;

/// Whole Naira to kobo.
pub const fn naira(amount: i64) -> Kobo {
    amount * KOBO_PER_NAIRA
}

/// Applies a percentage discount, rounding half-up to the nearest kobo.
/// Never returns a negative amount.
pub fn apply_discount_percent(amount: Kobo, percent: u8) -> Kobo {
    let percent = i64::from(percent.min(100));
    let scaled = amount.max(0).saturating_mul(100 - percent);
    scaled.saturating_add(50) / 100
}

/// Sums amounts, pinning at `Kobo::MAX` instead of overflowing.
pub fn total<I>(amounts: I) -> Kobo
where
    I: IntoIterator<Item = Kobo>,
{
    amounts.into_iter().fold(0, Kobo::saturating_add)
}

/// Renders an amount as `₦1,234.50`.
pub fn format_naira(amount: Kobo) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let whole = (abs / KOBO_PER_NAIRA as u64).to_string();
    let fraction = abs % KOBO_PER_NAIRA as u64;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}₦{}.{:02}", sign, grouped, fraction)
}

/// Integer average in kobo; zero when there is nothing to average over.
pub fn average(total: Kobo, count: usize) -> Kobo {
    if count == 0 {
        0
    } else {
        total / count as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rounds_half_up() {
        // 5% off ₦1,999.99 = 189999.05 kobo -> 189999
        assert_eq!(apply_discount_percent(199_999, 5), 189_999);
        // 5% off 10 kobo = 9.5 -> 10
        assert_eq!(apply_discount_percent(10, 5), 10);
        assert_eq!(apply_discount_percent(-500, 5), 0);
    }

    #[test]
    fn test_large_amounts_saturate() {
        assert_eq!(apply_discount_percent(Kobo::MAX, 5), Kobo::MAX / 100);
        assert_eq!(total([Kobo::MAX / 2, Kobo::MAX / 2, 50_000]), Kobo::MAX);
        assert_eq!(total([100_000, 250_000]), 350_000);
    }

    #[test]
    fn test_format_naira() {
        assert_eq!(format_naira(naira(2500)), "₦2,500.00");
        assert_eq!(format_naira(123_456_789), "₦1,234,567.89");
        assert_eq!(format_naira(5), "₦0.05");
        assert_eq!(format_naira(-naira(1)), "-₦1.00");
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert_eq!(average(10_000, 0), 0);
        assert_eq!(average(10_000, 4), 2_500);
    }
}
