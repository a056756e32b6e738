//! Strand state classification of single-cell Strand-seq libraries.
//!
//! Each part lives in its own crate and is enabled through a feature of the same name.
//! `classify` is on by default.
#[cfg(feature = "core")]
#[doc(inline)]
pub use strandhmm_core as core;

#[cfg(feature = "stats")]
#[doc(inline)]
pub use strandhmm_stats as stats;

#[cfg(feature = "hmm")]
#[doc(inline)]
pub use strandhmm_hmm as hmm;

#[cfg(feature = "classify")]
#[doc(inline)]
pub use strandhmm_classify as classify;

#[cfg(feature = "count")]
#[doc(inline)]
pub use strandhmm_count as count;

#[cfg(feature = "io")]
#[doc(inline)]
pub use strandhmm_io as io;
