use strandhmm_core::StrandState;

use crate::errors::HmmError;
use crate::hmm::N_STATES;

///
/// Symmetric, memoryless transition matrix over the strand states.
///
/// Every off-diagonal entry is `p_trans`, the diagonal is `1 - 2 * p_trans`.
/// Probabilities are kept in log space for decoding.
///
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    p_trans: f64,
    ln_matrix: [[f64; N_STATES]; N_STATES],
}

impl TransitionModel {
    ///
    /// Create a transition model from the probability of changing state between
    /// two neighbouring bins.
    ///
    pub fn new(p_trans: f64) -> Result<Self, HmmError> {
        if !(p_trans.is_finite() && (0.0..=0.5).contains(&p_trans)) {
            return Err(HmmError::InvalidTransition(p_trans));
        }

        let stay = (1.0 - 2.0 * p_trans).ln();
        let switch = p_trans.ln();
        let mut ln_matrix = [[switch; N_STATES]; N_STATES];
        for (i, row) in ln_matrix.iter_mut().enumerate() {
            row[i] = stay;
        }

        Ok(Self { p_trans, ln_matrix })
    }

    ///
    /// Spread an expected number of state changes per cell over the whole genome.
    ///
    /// # Arguments
    /// - expected_events: state changes expected in one cell, genome wide
    /// - n_bins: number of bins the decoder will see
    ///
    pub fn from_expected_events(expected_events: f64, n_bins: usize) -> Result<Self, HmmError> {
        if n_bins == 0 {
            return Err(HmmError::NoBins);
        }
        Self::new(expected_events / n_bins as f64)
    }

    pub fn p_trans(&self) -> f64 {
        self.p_trans
    }

    pub fn probability(&self, from: StrandState, to: StrandState) -> f64 {
        self.ln_probability(from, to).exp()
    }

    #[inline]
    pub fn ln_probability(&self, from: StrandState, to: StrandState) -> f64 {
        self.ln_matrix[from.index()][to.index()]
    }

    #[inline]
    pub(crate) fn ln_matrix(&self) -> &[[f64; N_STATES]; N_STATES] {
        &self.ln_matrix
    }
}
