//! Mixed tab/space indentation amounts.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// An amount of indentation measured as `(tabs, spaces)`.
///
/// Components may go negative while expectations are being adjusted;
/// only parsed indentation is guaranteed non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndentVector {
    pub tabs: i64,
    pub spaces: i64,
}

pub const ZERO: IndentVector = IndentVector::new(0, 0);
pub const ONE_TAB: IndentVector = IndentVector::new(1, 0);

/// How leniently leading whitespace is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Any tab after a space is an error.
    Strict,
    /// Like `Strict`, but whitespace-only lines are always accepted.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("indentation contains mixed spaces and tabs")]
pub struct MixedIndentation;

impl IndentVector {
    #[must_use]
    pub const fn new(tabs: i64, spaces: i64) -> Self {
        Self { tabs, spaces }
    }

    #[must_use]
    pub const fn spaces(spaces: i64) -> Self {
        Self::new(0, spaces)
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.tabs == 0 && self.spaces == 0
    }

    /// Number of whitespace characters this amount is written with.
    #[must_use]
    pub const fn characters(self) -> i64 {
        self.tabs + self.spaces
    }

    /// Component-wise product with `(tab_factor, space_factor)`.
    #[must_use]
    pub const fn scale(self, (tab_factor, space_factor): (i64, i64)) -> Self {
        Self::new(self.tabs * tab_factor, self.spaces * space_factor)
    }

    /// Read the leading tab/space run of `line`.
    ///
    /// # Errors
    ///
    /// Returns `MixedIndentation` when a tab follows a space in the run,
    /// unless `mode` is `Lenient` and the line holds nothing but whitespace.
    pub fn parse(line: &str, mode: ParseMode) -> Result<Self, MixedIndentation> {
        let mut indent = ZERO;
        let mut mixed = false;
        let mut rest = line;
        for (offset, ch) in line.char_indices() {
            match ch {
                '\t' if indent.spaces > 0 => {
                    mixed = true;
                    indent.tabs += 1;
                }
                '\t' => indent.tabs += 1,
                ' ' => indent.spaces += 1,
                _ => {
                    rest = &line[offset..];
                    break;
                }
            }
            rest = &line[offset + ch.len_utf8()..];
        }

        let blank = rest.trim_end_matches(['\r', '\n']).trim().is_empty();
        if mixed && !(mode == ParseMode::Lenient && blank) {
            return Err(MixedIndentation);
        }
        Ok(indent)
    }
}

impl Add for IndentVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.tabs + rhs.tabs, self.spaces + rhs.spaces)
    }
}

impl Sub for IndentVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.tabs - rhs.tabs, self.spaces - rhs.spaces)
    }
}

impl Neg for IndentVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.tabs, -self.spaces)
    }
}

impl AddAssign for IndentVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for IndentVector {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for IndentVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for IndentVector {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for IndentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}", plural(self.tabs, "tab"), plural(self.spaces, "space"))
    }
}

/// `1 tab`, `2 tabs`, `0 spaces`.
#[must_use]
pub fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
