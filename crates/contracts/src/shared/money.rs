//! Денежные суммы: округление до копеек

/// Округлить до 2 знаков после запятой
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Верхняя граница суммы, цены и количества в чеке
pub const MAX_AMOUNT: f64 = 1e12;

/// Конечное число в пределах `MAX_AMOUNT` по модулю
pub fn is_sane_amount(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_AMOUNT
}

/// Процент от суммы, процент ограничен диапазоном 0..=100
pub fn percent_of(amount: f64, percent: f64) -> f64 {
    round_money(amount * percent.clamp(0.0, 100.0) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(10.005_1), 10.01);
        assert_eq!(round_money(3.14159), 3.14);
        assert_eq!(round_money(-2.499), -2.5);
    }

    #[test]
    fn test_is_sane_amount() {
        assert!(is_sane_amount(0.0));
        assert!(is_sane_amount(-MAX_AMOUNT));
        assert!(!is_sane_amount(1e200));
        assert!(!is_sane_amount(f64::INFINITY));
        assert!(!is_sane_amount(f64::NAN));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(200.0, 15.0), 30.0);
        assert_eq!(percent_of(200.0, 150.0), 200.0);
        assert_eq!(percent_of(200.0, -5.0), 0.0);
    }
}
