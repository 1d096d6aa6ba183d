//! The fixed set of expense categories.

use serde::{Deserialize, Serialize};

/// The category an expense is filed under.
///
/// The set is closed on purpose: grouping and reporting stay consistent only
/// if every record uses one of these spellings, and `Others` is the catch-all
/// for anything that does not fit. Parsing expects the lowercase form; the
/// validation rules lowercase user input first so `Food` and `food` both work.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Apartment,
    Transport,
    Fees,
    Health,
    Social,
    Shopping,
    Travel,
    #[default]
    Others,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Apartment,
        Category::Transport,
        Category::Fees,
        Category::Health,
        Category::Social,
        Category::Shopping,
        Category::Travel,
        Category::Others,
    ];
}
