use std::fmt;

/// Fixed-point currency value with 2 decimal places, stored as a scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

/// How many fraction digits to print when grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fraction {
    /// Between 0 and 2 digits, trailing zeros dropped (`8,920`, `12.5`).
    Trimmed,
    /// Always 2 digits (`8,920.00`).
    Fixed,
}

impl Amount {
    const SCALE: i64 = 100;

    pub const ZERO: Amount = Amount(0);

    pub const fn from_units(units: i64) -> Self {
        Amount(units * Self::SCALE)
    }

    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    pub const fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parse what the user typed into the amount field.
    ///
    /// Group separators are ignored and the longest numeric prefix is used.
    /// Blank or unparsable input yields zero, the field never errors.
    pub fn parse_input(input: &str) -> Self {
        let cleaned: String = input.chars().filter(|c| *c != ',').collect();
        let cleaned = cleaned.trim();

        let mut whole: i64 = 0;
        let mut frac_digits = Vec::with_capacity(3);
        let mut seen_digit = false;
        let mut in_fraction = false;

        for c in cleaned.chars() {
            match c {
                '0'..='9' => {
                    seen_digit = true;
                    let digit = i64::from(c as u8 - b'0');
                    if in_fraction {
                        if frac_digits.len() < 3 {
                            frac_digits.push(digit);
                        }
                    } else {
                        whole = whole.saturating_mul(10).saturating_add(digit);
                    }
                }
                '.' if !in_fraction => in_fraction = true,
                _ => break,
            }
        }

        if !seen_digit {
            return Amount::ZERO;
        }

        let tenths = frac_digits.first().copied().unwrap_or(0);
        let hundredths = frac_digits.get(1).copied().unwrap_or(0);
        let round_up = frac_digits.get(2).is_some_and(|d| *d >= 5);

        let cents = whole
            .saturating_mul(Self::SCALE)
            .saturating_add(tenths * 10 + hundredths)
            .saturating_add(i64::from(round_up));
        Amount(cents)
    }

    /// Apply one edit of the amount field.
    ///
    /// Anything other than digits and `.` is stripped. Edits producing a second
    /// `.` or a third decimal are refused and `previous` is kept.
    pub fn sanitize_input(previous: &str, edited: &str) -> String {
        let filtered: String = edited
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let mut parts = filtered.split('.');
        let _whole = parts.next();
        let fraction = parts.next();
        if parts.next().is_some() {
            return previous.to_string();
        }
        if fraction.is_some_and(|f| f.len() > 2) {
            return previous.to_string();
        }
        filtered
    }

    /// en-US grouping: `125,680.5` or `125,680.50`.
    pub fn grouped(self, fraction: Fraction) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        match fraction {
            Fraction::Fixed => format!("{sign}{grouped}.{frac:02}"),
            Fraction::Trimmed if frac == 0 => format!("{sign}{grouped}"),
            Fraction::Trimmed if frac % 10 == 0 => format!("{sign}{grouped}.{}", frac / 10),
            Fraction::Trimmed => format!("{sign}{grouped}.{frac:02}"),
        }
    }

    /// Balance formatting with a currency symbol, e.g. `CN¥8,920.00`.
    pub fn with_currency(self, currency: &str) -> String {
        let symbol = match currency {
            "CNY" => "CN¥".to_string(),
            "USD" => "$".to_string(),
            "EUR" => "€".to_string(),
            "GBP" => "£".to_string(),
            other => format!("{other}\u{a0}"),
        };
        let grouped = self.grouped(Fraction::Fixed);
        match grouped.strip_prefix('-') {
            Some(abs) => format!("-{symbol}{abs}"),
            None => format!("{symbol}{grouped}"),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let frac = abs % Self::SCALE;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}
