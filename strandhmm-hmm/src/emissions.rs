use strandhmm_stats::{ConfigurationError, IndependentChannels, NegativeBinomial};

use crate::hmm::N_STATES;

/// Emission of one strand state: crick and watson as independent channels.
pub type StrandEmission = IndependentChannels<NegativeBinomial>;

///
/// Parametrize the three state emissions of one cell.
///
/// With `n = (M / 2) * p / (1 - p)` the states use
///
/// | state | crick      | watson     |
/// |-------|------------|------------|
/// | CC    | NB(p, 2n)  | NB(p, z)   |
/// | WC    | NB(p, n)   | NB(p, n)   |
/// | WW    | NB(p, z)   | NB(p, 2n)  |
///
/// where `z` is the fixed background rate of the absent channel.
///
/// # Arguments
/// - median_bin_count: the cell's median total count per bin (M)
/// - p: dispersion of the cell's sample
/// - zero_channel_rate: background rate z
///
pub fn strand_emissions(
    median_bin_count: f64,
    p: f64,
    zero_channel_rate: f64,
) -> Result<[StrandEmission; N_STATES], ConfigurationError> {
    if !(p.is_finite() && p > 0.0 && p < 1.0) {
        return Err(ConfigurationError::InvalidDispersion(p));
    }
    let n = median_bin_count / 2.0 * p / (1.0 - p);

    let nb = |r: f64| NegativeBinomial::new(p, r);
    Ok([
        IndependentChannels::new(vec![nb(2.0 * n)?, nb(zero_channel_rate)?]),
        IndependentChannels::new(vec![nb(n)?, nb(n)?]),
        IndependentChannels::new(vec![nb(zero_channel_rate)?, nb(2.0 * n)?]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strandhmm_stats::Emission;

    #[rstest]
    fn test_state_means() {
        let [cc, wc, ww] = strand_emissions(100.0, 0.5, 0.5).unwrap();

        // n = 50 at p = 0.5, so the mean of NB(p, r) is r
        assert_eq!(cc.channels()[0].mean(), 100.0);
        assert_eq!(cc.channels()[1].mean(), 0.5);
        assert_eq!(wc.channels()[0].mean(), 50.0);
        assert_eq!(wc.channels()[1].mean(), 50.0);
        assert_eq!(ww.channels()[0].mean(), 0.5);
        assert_eq!(ww.channels()[1].mean(), 100.0);
    }

    #[rstest]
    fn test_states_prefer_their_signal() {
        let [cc, wc, ww] = strand_emissions(100.0, 0.3, 0.5).unwrap();
        let crick_only = [100, 0];
        let balanced = [50, 50];
        let watson_only = [0, 100];

        assert!(cc.ln_prob(&crick_only) > wc.ln_prob(&crick_only));
        assert!(cc.ln_prob(&crick_only) > ww.ln_prob(&crick_only));
        assert!(wc.ln_prob(&balanced) > cc.ln_prob(&balanced));
        assert!(wc.ln_prob(&balanced) > ww.ln_prob(&balanced));
        assert!(ww.ln_prob(&watson_only) > cc.ln_prob(&watson_only));
        assert!(ww.ln_prob(&watson_only) > wc.ln_prob(&watson_only));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(1.7)]
    #[case(f64::NAN)]
    fn test_degenerate_dispersion_is_reported(#[case] p: f64) {
        assert!(matches!(
            strand_emissions(100.0, p, 0.5),
            Err(ConfigurationError::InvalidDispersion(_))
        ));
    }

    #[rstest]
    fn test_zero_median_is_reported() {
        assert!(matches!(
            strand_emissions(0.0, 0.5, 0.5),
            Err(ConfigurationError::InvalidRate(_))
        ));
    }
}
