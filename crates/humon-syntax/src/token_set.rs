use crate::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenSet {
    bits: u16,
}

impl TokenSet {
    pub const EMPTY: Self = Self { bits: 0 };

    const fn from_kind(kind: TokenKind) -> Self {
        let kind = kind as u16;
        debug_assert!(kind < u16::BITS as u16, "Too many token kinds for the bitset.");
        Self { bits: 1 << kind }
    }

    pub const fn union(self, other: Self) -> Self {
        Self { bits: self.bits | other.bits }
    }

    pub const fn new<const N: usize>(kinds: [TokenKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.bits & Self::from_kind(kind).bits != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenKind::*;

    #[test]
    fn contains_only_members() {
        const VALUE_START: TokenSet = TokenSet::new([LEFT_BRACKET, LEFT_BRACE, WORD]);

        assert!(VALUE_START.contains(WORD));
        assert!(VALUE_START.contains(LEFT_BRACE));
        assert!(!VALUE_START.contains(COLON));
        assert!(!TokenSet::EMPTY.contains(EOF));
        assert!(VALUE_START.union(TokenSet::new([EOF])).contains(EOF));
    }
}
