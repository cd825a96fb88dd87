//! Roster view contract.
//!
//! The renderer owns the display surface; core only hands it the full,
//! ordered list after each mutation. Positions passed back through delete
//! actions are indices into that same list.

use crate::model::record::StudentRecord;

/// Display surface for the roster.
pub trait ViewRenderer {
    /// Replaces everything currently displayed with `records`.
    fn render_all(&mut self, records: &[StudentRecord]);
}
