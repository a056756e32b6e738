use crate::negative_binomial::NegativeBinomial;

/// A count model for a single observation channel.
pub trait ChannelModel {
    /// Natural log of the probability of observing `k` in this channel.
    fn ln_pmf(&self, k: u32) -> f64;
}

impl ChannelModel for NegativeBinomial {
    #[inline]
    fn ln_pmf(&self, k: u32) -> f64 {
        NegativeBinomial::ln_pmf(self, k)
    }
}

/// Evaluates the joint probability of a vector of channel observations.
///
/// Hidden Markov models only see this trait, so a correlated emission can
/// replace [`IndependentChannels`] without touching the decoder.
pub trait Emission {
    /// Number of channels an observation must provide.
    fn n_channels(&self) -> usize;

    /// Natural log of the joint probability of `observation`.
    fn ln_prob(&self, observation: &[u32]) -> f64;

    fn prob(&self, observation: &[u32]) -> f64 {
        self.ln_prob(observation).exp()
    }
}

///
/// Joint emission over conditionally independent channels.
///
/// The probability of an observation vector is the product of the per-channel
/// probabilities, accumulated as a sum of logs.
///
#[derive(Debug, Clone)]
pub struct IndependentChannels<D> {
    channels: Vec<D>,
}

impl<D: ChannelModel> IndependentChannels<D> {
    pub fn new(channels: Vec<D>) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &[D] {
        &self.channels
    }
}

impl<D: ChannelModel> Emission for IndependentChannels<D> {
    fn n_channels(&self) -> usize {
        self.channels.len()
    }

    fn ln_prob(&self, observation: &[u32]) -> f64 {
        debug_assert_eq!(observation.len(), self.channels.len());
        self.channels
            .iter()
            .zip(observation)
            .map(|(model, &k)| model.ln_pmf(k))
            .sum()
    }
}
