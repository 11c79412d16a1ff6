// Adapters layer: concrete implementations for external systems (upstream http, scraped sites, geodata).

pub mod html;
pub mod http;
pub mod justdial;
pub mod overpass;
pub mod wikipedia;

pub use http::{UpstreamClient, UpstreamPage};
pub use justdial::JustdialAdapter;
pub use overpass::{OverpassClient, UpstreamReply};
pub use wikipedia::WikipediaAdapter;
