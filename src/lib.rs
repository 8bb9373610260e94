// ABOUTME: Library module for the blogagogo site generator.
// ABOUTME: Contains the incremental build engine, the blog index and the request resolver.

// Reexport modules
pub mod blog;
pub mod config;
pub mod errors;
pub mod frontmatter;
pub mod generator;
pub mod html;
pub mod page;
pub mod render;
pub mod resolver;
pub mod serve;
pub mod tracker;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use errors::{Result, SiteError};
pub use frontmatter::{decode_page_info, split_front_matter};
pub use generator::{clean_previous_run, BuildReport, Generator};
pub use page::{Page, PageInfo};
pub use render::{Renderer, TemplateSource};
pub use resolver::Resolver;
pub use serve::start_server;
pub use tracker::{TrackedFile, Tracker};
pub use watch::{watch_site, WatchConfig};
