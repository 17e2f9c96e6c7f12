pub mod issue_tracker;
pub mod ticket_plugin;

pub use issue_tracker::IssueTracker;
pub use ticket_plugin::TicketPlugin;
