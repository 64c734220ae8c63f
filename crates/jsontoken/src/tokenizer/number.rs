//! Character-level progression through a numeric literal.

/// Position within a number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberState {
    /// A leading `-`.
    Sign,
    /// A single `0` integer part.
    LeadingZero,
    /// One or more integer digits not starting with `0`.
    LeadingDigit,
    /// The `.` before the fraction.
    Decimal,
    FractionDigit,
    /// The `e` or `E`.
    ExpMarker,
    /// The `+` or `-` after the exponent marker.
    ExpSign,
    ExpDigit,
}

/// Whether `c` can open a number literal.
pub(crate) fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

impl NumberState {
    /// State after the first character. `c` must satisfy [`is_number_start`].
    pub fn start(c: char) -> Self {
        match c {
            '-' => Self::Sign,
            '0' => Self::LeadingZero,
            _ => Self::LeadingDigit,
        }
    }

    /// The state reached by consuming `c`, or `None` if `c` cannot extend the
    /// literal.
    pub fn step(self, c: char) -> Option<Self> {
        use NumberState::*;

        let digit = c.is_ascii_digit();
        let exp = c == 'e' || c == 'E';
        match self {
            Sign if c == '0' => Some(LeadingZero),
            Sign if digit => Some(LeadingDigit),
            LeadingZero if c == '.' => Some(Decimal),
            LeadingZero if exp => Some(ExpMarker),
            LeadingDigit if digit => Some(LeadingDigit),
            LeadingDigit if c == '.' => Some(Decimal),
            LeadingDigit if exp => Some(ExpMarker),
            Decimal | FractionDigit if digit => Some(FractionDigit),
            FractionDigit if exp => Some(ExpMarker),
            ExpMarker if c == '+' || c == '-' => Some(ExpSign),
            ExpMarker | ExpSign | ExpDigit if digit => Some(ExpDigit),
            _ => None,
        }
    }

    /// Whether a literal ending in this state is a complete number.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::LeadingZero | Self::LeadingDigit | Self::FractionDigit | Self::ExpDigit
        )
    }
}
