use std::fmt::{self, Display};

///
/// Strand state of a chromosome segment in one cell.
///
/// The enumeration order (CC < WC < WW) is also the tie breaking order of
/// the decoder.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrandState {
    /// Both homologs contribute Crick reads only
    CC,
    /// One Watson, one Crick homolog
    WC,
    /// Both homologs contribute Watson reads only
    WW,
}

impl StrandState {
    pub const ALL: [StrandState; 3] = [StrandState::CC, StrandState::WC, StrandState::WW];

    pub fn index(&self) -> usize {
        match self {
            StrandState::CC => 0,
            StrandState::WC => 1,
            StrandState::WW => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        StrandState::ALL.get(idx).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrandState::CC => "CC",
            StrandState::WC => "WC",
            StrandState::WW => "WW",
        }
    }
}

impl Display for StrandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StrandState::CC, 0, "CC")]
    #[case(StrandState::WC, 1, "WC")]
    #[case(StrandState::WW, 2, "WW")]
    fn test_index_and_name(#[case] state: StrandState, #[case] idx: usize, #[case] name: &str) {
        assert_eq!(state.index(), idx);
        assert_eq!(StrandState::from_index(idx), Some(state));
        assert_eq!(state.to_string(), name);
    }

    #[rstest]
    fn test_enumeration_order() {
        assert!(StrandState::CC < StrandState::WC);
        assert!(StrandState::WC < StrandState::WW);
        assert_eq!(StrandState::from_index(3), None);
    }
}
