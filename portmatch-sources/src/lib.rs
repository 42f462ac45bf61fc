//! Library and catalog sources for portmatch.
//!
//! Adapters that turn storefront exports and the PortMaster catalog into
//! the plain entry lists the matcher works on, plus the TTL cache and user
//! configuration they share.

pub mod cache;
pub mod config;
pub mod epic;
pub mod error;
pub mod gog;
pub mod library;
pub mod portmaster;
pub mod steam;

pub use cache::{
    Cache, Clock, DEFAULT_TTL, DiskCache, DiskEntryInfo, ManualClock, MemoryCache, NullCache,
    SystemClock,
};
pub use config::{ConfigSource, ConfigSources, Settings};
pub use epic::EpicLibrary;
pub use error::SourceError;
pub use gog::GogLibrary;
pub use library::{LibraryParser, dedup_by_name, describe_error, parser_for};
pub use portmaster::{PortmasterClient, clean_port_name, parse_contents_listing, parse_ports_json};
pub use steam::{SteamClient, SteamIdInput, SteamLibrary, parse_steam_input};
