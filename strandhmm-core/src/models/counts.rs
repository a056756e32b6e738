/// Reads counted in one bin of one cell, split by strand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StrandCount {
    pub crick: u32,
    pub watson: u32,
}

impl StrandCount {
    pub fn new(crick: u32, watson: u32) -> Self {
        StrandCount { crick, watson }
    }

    pub fn total(&self) -> u32 {
        self.crick + self.watson
    }

    /// Channel vector in emission order: crick first, watson second.
    #[inline]
    pub fn channels(&self) -> [u32; 2] {
        [self.crick, self.watson]
    }
}
