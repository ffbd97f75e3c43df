pub mod catalog;
pub mod config;
pub mod context;
pub mod filter;
pub mod loader;
pub mod location;
pub mod popup;
pub mod registry;
pub mod wait;

pub use config::{InitError, InitOptions, MapConfig};
pub use context::{ApplyReport, MapContext};
pub use filter::{Facet, FilterState};
pub use loader::{DocumentHead, InjectOutcome, LoadError, ResourceKind, ResourceLoader};
pub use location::Location;
pub use popup::{BadgeChip, PopupContent, TagIcon};
pub use registry::{BuildReport, MapSurface, MarkerRegistry, RegistryError};
pub use wait::{CancelToken, PendingWaits, WaitError, WaitPolicy};
