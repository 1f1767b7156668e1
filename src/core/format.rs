use super::types::MonthlyRecord;

/// Whole-unit currency rendering with grouped thousands, e.g. `Rp 1.000.000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub prefix: String,
    pub group_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::rupiah()
    }
}

impl CurrencyFormat {
    pub fn rupiah() -> Self {
        Self {
            prefix: "Rp".to_string(),
            group_separator: '.',
        }
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{} {value}", self.prefix);
        }

        let digits = format!("{:.0}", value.abs());
        let grouped = group_digits(&digits, self.group_separator);
        if value.is_sign_negative() {
            format!("{} -{grouped}", self.prefix)
        } else {
            format!("{} {grouped}", self.prefix)
        }
    }

    pub fn display_line(&self, record: &MonthlyRecord) -> String {
        format!(
            "Month {}: Interest = {}, Capital = {}, Accumulated Interest = {}",
            record.month,
            self.format(record.interest_earned),
            self.format(record.capital_after),
            self.format(record.accumulated_unreinvested_interest),
        )
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rupiah_with_dot_grouping() {
        let fmt = CurrencyFormat::rupiah();
        assert_eq!(fmt.format(1_000_000.0), "Rp 1.000.000");
        assert_eq!(fmt.format(5_416.666_666), "Rp 5.417");
        assert_eq!(fmt.format(999.4), "Rp 999");
        assert_eq!(fmt.format(0.0), "Rp 0");
        assert_eq!(fmt.format(123_456_789.0), "Rp 123.456.789");
    }

    #[test]
    fn formats_negative_amounts_after_prefix() {
        let fmt = CurrencyFormat::rupiah();
        assert_eq!(fmt.format(-1_234.2), "Rp -1.234");
        assert_eq!(fmt.format(-0.2), "Rp -0");
    }

    #[test]
    fn honours_custom_prefix_and_separator() {
        let fmt = CurrencyFormat {
            prefix: "$".to_string(),
            group_separator: ',',
        };
        assert_eq!(fmt.format(10_833.33), "$ 10,833");
    }

    #[test]
    fn display_line_lists_interest_capital_and_accumulator() {
        let record = MonthlyRecord {
            month: 1,
            contribution: 0.0,
            interest_earned: 5_416.666_666_666_667,
            reinvested: 0.0,
            capital_after: 1_000_000.0,
            accumulated_unreinvested_interest: 5_416.666_666_666_667,
        };
        assert_eq!(
            CurrencyFormat::default().display_line(&record),
            "Month 1: Interest = Rp 5.417, Capital = Rp 1.000.000, Accumulated Interest = Rp 5.417"
        );
    }
}
