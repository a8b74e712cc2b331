pub mod github;
pub mod totals;
pub mod weekly;


pub use github::{GraphqlTransport, HistoryFetcher, HistoryFields, HttpTransport};
pub use totals::{aggregate_line_totals, rank_by_lines_changed};
pub use weekly::aggregate_weekly;
