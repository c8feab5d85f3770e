//! Password strength indicator.

use std::fmt;

/// Coarse password strength, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Empty,
    Weak,
    Fair,
    Good,
    Strong,
}

impl Strength {
    /// Display label; empty for [`Strength::Empty`].
    pub fn label(self) -> &'static str {
        match self {
            Strength::Empty => "",
            Strength::Weak => "Weak",
            Strength::Fair => "Fair",
            Strength::Good => "Good",
            Strength::Strong => "Strong",
        }
    }

    /// Lowercase level name, used as a style class suffix.
    pub fn level(self) -> &'static str {
        match self {
            Strength::Empty => "empty",
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Good => "good",
            Strength::Strong => "strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.level())
    }
}

const SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Rates a password.
///
/// Under six characters is weak; it needs an uppercase letter and a digit to
/// be better than fair, and one of `!@#$%^&*` on top of that to be strong.
pub fn password_strength(password: &str) -> Strength {
    if password.is_empty() {
        return Strength::Empty;
    }
    if password.chars().count() < 6 {
        return Strength::Weak;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_digit {
        return Strength::Fair;
    }
    if !password.contains(SPECIALS) {
        return Strength::Good;
    }
    Strength::Strong
}
