//! Signal derivation, fusion and scoring.

pub mod engine;
pub mod fusion;
pub mod scoring;
pub mod sources;

pub use engine::{PairError, PairEvaluation, SignalEngine};
pub use fusion::{FusionBreakdown, FusionEngine, LabelContribution, LabeledSignalSet};
pub use scoring::*;
pub use sources::{MeanReversionSignals, MomentumSignals, TrendSignals, VolatilitySignals};
