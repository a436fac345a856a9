//! Card system: definitions, abilities, instances, storage and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data plus its `CardBehavior`
//! - `Card`: Runtime card state (owner, placement, attachments)
//! - `CardStore`: Every card instance of a game
//! - `CardRegistry`: Definition lookup

pub mod behavior;
pub mod definition;
pub mod instance;
pub mod registry;
pub mod store;

pub use behavior::{Activation, CardBehavior, NoAbility};
pub use definition::{CardCategory, CardDefinition, CardId, Moment};
pub use instance::{Card, Placement, Side};
pub use registry::CardRegistry;
pub use store::CardStore;
