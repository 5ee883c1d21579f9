#![forbid(unsafe_code)]

pub mod app_services;
pub mod asset_proxy;
pub mod asset_source;
pub mod blobs;
pub mod chooser;
pub mod config;
pub mod error;
pub mod roster_loader;
pub mod sessions;

pub use app_services::AppServices;
pub use asset_proxy::{AssetProxy, ProxyRequest, ProxyResponse, fetch_image_route};
pub use asset_source::AssetSource;
pub use blobs::BlobStore;
pub use chooser::{IndexChooser, RandomChooser, SequenceChooser};
pub use config::WikiConfig;
pub use error::{AppServicesError, FetchError, ProxyError, RosterLoadError, SessionError};
pub use roster_loader::{RosterLoader, full_resolution_path, parse_species_html};
pub use sessions::{
    Completion, DropReason, FetchRequest, FetchTicket, GuessLoopService, GuessSession,
    LoadedImage, SessionPhase, SessionState, Slot,
};
