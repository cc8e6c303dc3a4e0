pub mod formatter;

pub use formatter::{
    format_batch_table, format_json, format_result_detail, format_score, format_summary,
    should_use_colors, ScoredTeam,
};
