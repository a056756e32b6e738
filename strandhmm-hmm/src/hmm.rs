use strandhmm_core::StrandState;
use strandhmm_stats::Emission;

use crate::transitions::TransitionModel;

/// Number of hidden states: CC, WC and WW.
pub const N_STATES: usize = 3;

///
/// Hidden Markov model over the strand states of consecutive bins.
///
/// The start distribution is uniform. All arithmetic happens in log space, so
/// long chromosomes do not underflow.
///
#[derive(Debug, Clone)]
pub struct StrandStateHmm<E> {
    ln_initial: [f64; N_STATES],
    transitions: TransitionModel,
    emissions: [E; N_STATES],
}

impl<E: Emission> StrandStateHmm<E> {
    ///
    /// Create a model from a transition matrix and one emission per state, in
    /// state order (CC, WC, WW).
    ///
    pub fn new(transitions: TransitionModel, emissions: [E; N_STATES]) -> Self {
        Self {
            ln_initial: [(1.0 / N_STATES as f64).ln(); N_STATES],
            transitions,
            emissions,
        }
    }

    ///
    /// Most likely state path for an ordered run of bins.
    ///
    /// Returns the path together with its log probability. An empty observation
    /// sequence decodes to an empty path with log probability 0. Ties are broken
    /// towards the earlier state in CC < WC < WW order.
    ///
    /// # Arguments
    /// - observations: one channel vector per bin (crick, watson)
    ///
    pub fn viterbi<O: AsRef<[u32]>>(&self, observations: &[O]) -> (Vec<StrandState>, f64) {
        let t_len = observations.len();
        if t_len == 0 {
            return (Vec::new(), 0.0);
        }

        let ln_trans = self.transitions.ln_matrix();
        let mut backpointers = vec![[0u8; N_STATES]; t_len];

        let first = observations[0].as_ref();
        let mut delta = [f64::NEG_INFINITY; N_STATES];
        for (s, d) in delta.iter_mut().enumerate() {
            *d = self.ln_initial[s] + self.emissions[s].ln_prob(first);
        }

        for t in 1..t_len {
            let obs = observations[t].as_ref();
            let mut next = [f64::NEG_INFINITY; N_STATES];
            for j in 0..N_STATES {
                let mut best_val = f64::NEG_INFINITY;
                let mut best_state = 0;
                for i in 0..N_STATES {
                    let v = delta[i] + ln_trans[i][j];
                    if v > best_val {
                        best_val = v;
                        best_state = i;
                    }
                }
                next[j] = best_val + self.emissions[j].ln_prob(obs);
                backpointers[t][j] = best_state as u8;
            }
            delta = next;
        }

        let mut best_final = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (s, &score) in delta.iter().enumerate() {
            if score > best_score {
                best_score = score;
                best_final = s;
            }
        }

        let mut path = vec![StrandState::CC; t_len];
        let mut state = best_final;
        for t in (0..t_len).rev() {
            path[t] = StrandState::ALL[state];
            state = backpointers[t][state] as usize;
        }

        (path, best_score)
    }

    /// Most likely state path, see [`StrandStateHmm::viterbi`].
    pub fn decode<O: AsRef<[u32]>>(&self, observations: &[O]) -> Vec<StrandState> {
        self.viterbi(observations).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::emissions::{StrandEmission, strand_emissions};

    #[fixture]
    fn hmm() -> StrandStateHmm<StrandEmission> {
        let transitions = TransitionModel::new(0.01).unwrap();
        let emissions = strand_emissions(100.0, 0.5, 0.5).unwrap();
        StrandStateHmm::new(transitions, emissions)
    }

    /// Emission that gives every observation the same probability
    struct Flat;

    impl Emission for Flat {
        fn n_channels(&self) -> usize {
            2
        }

        fn ln_prob(&self, _observation: &[u32]) -> f64 {
            -1.0
        }
    }

    #[rstest]
    fn test_empty_sequence(hmm: StrandStateHmm<StrandEmission>) {
        let observations: Vec<[u32; 2]> = vec![];
        assert_eq!(hmm.viterbi(&observations), (vec![], 0.0));
    }

    #[rstest]
    fn test_single_bin(hmm: StrandStateHmm<StrandEmission>) {
        assert_eq!(hmm.decode(&[[95u32, 1]]), vec![StrandState::CC]);
        assert_eq!(hmm.decode(&[[47u32, 53]]), vec![StrandState::WC]);
        assert_eq!(hmm.decode(&[[0u32, 101]]), vec![StrandState::WW]);
    }

    #[rstest]
    fn test_one_switch(hmm: StrandStateHmm<StrandEmission>) {
        let mut observations = vec![[0u32, 100]; 30];
        observations.extend(vec![[50u32, 50]; 20]);

        let path = hmm.decode(&observations);
        let mut expected = vec![StrandState::WW; 30];
        expected.extend(vec![StrandState::WC; 20]);
        assert_eq!(path, expected);
    }

    #[rstest]
    fn test_noisy_bin_keeps_state(hmm: StrandStateHmm<StrandEmission>) {
        let mut observations = vec![[100u32, 0]; 20];
        observations[10] = [75, 8];
        let path = hmm.decode(&observations);
        assert_eq!(path, vec![StrandState::CC; 20]);
    }

    #[rstest]
    fn test_ties_resolve_to_first_state() {
        let hmm = StrandStateHmm::new(TransitionModel::new(0.1).unwrap(), [Flat, Flat, Flat]);
        let path = hmm.decode(&[[1u32, 2], [3, 4], [5, 6]]);
        assert_eq!(path, vec![StrandState::CC; 3]);
    }

    #[rstest]
    fn test_decoding_is_deterministic(hmm: StrandStateHmm<StrandEmission>) {
        let observations: Vec<[u32; 2]> = (0..200u32)
            .map(|i| if (i / 37) % 2 == 0 { [i % 7, 90 + i % 11] } else { [45 + i % 9, 50] })
            .collect();
        let first = hmm.viterbi(&observations);
        let second = hmm.viterbi(&observations);
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_log_probability_is_finite_on_long_sequences(hmm: StrandStateHmm<StrandEmission>) {
        let observations = vec![[48u32, 52]; 100_000];
        let (path, score) = hmm.viterbi(&observations);
        assert_eq!(path.len(), 100_000);
        assert!(score.is_finite());
        assert!(score < 0.0);
    }
}
