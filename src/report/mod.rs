//! Pure formatting: issue tables, nested tables, script data, metrics,
//! and sprint naming. Nothing in here touches the network.

pub mod metrics;
pub mod script;
pub mod snippet;
pub mod sprint;
pub mod table;

pub use metrics::{
    sizing, sum_original_estimate, sum_story_points, sum_story_points_excluding_epics, Department,
};
pub use script::render_script_data;
pub use snippet::append_force_update_callout;
pub use sprint::{cadence_fixversion, one_week_sprint, two_week_sprint, CadenceRelease, SprintWindow};
pub use table::{render_nested_table, FieldRegistry, IssueTableRenderer};
