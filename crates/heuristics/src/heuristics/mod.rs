//! Built-in heuristics.

mod entity;
mod layout;
mod scroll;
mod tap;
mod word;

pub use entity::{EntityHeuristic, CAMEL_CASE_PROPER_NOUN_LANGUAGES};
pub use layout::{ShortTextRunSuppression, SmallTextSuppression};
pub use scroll::RecentScrollSuppression;
pub use tap::{SecondTapMlOverride, TapDurationSuppression, TapFarFromPreviousSuppression};
pub use word::{NotLongWordSuppression, ShortWordSuppression, WordEdgeSuppression};
