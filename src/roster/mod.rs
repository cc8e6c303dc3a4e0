pub mod loader;
pub mod types;

pub use loader::{load_context, load_roster, load_roster_async};
pub use types::{
    AvailabilityStatus, ChemistryContext, HistoricalRecord, Role, RosterMember, TeamRoster,
    TransitData,
};
