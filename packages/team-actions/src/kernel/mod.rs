//! Infrastructure seams: port traits, the dependency container, and the HTTP
//! adapter that backs the membership port in production.

pub mod deps;
pub mod traits;

pub use deps::{ActionDeps, HttpMembershipService};
pub use traits::{BaseMembershipService, BaseNavigator, BaseNotifier, BasePanelView};
