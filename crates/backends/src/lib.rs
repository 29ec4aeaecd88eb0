//! HTTP clients for the backend services behind the tools.
//!
//! Every service speaks the same envelope: `{code, msg, data}` with
//! `code == 0` meaning success. The envelope is unwrapped here, once; the
//! rest of the system only ever sees `serde_json::Value` payloads or a
//! `BackendError`.

mod envelope;
mod knowledge;
mod memory;
mod session;
mod weather;
mod web_search;

pub use envelope::ServiceClient;
pub use knowledge::HttpKnowledgeService;
pub use memory::HttpMemoryService;
pub use session::HttpSessionStore;
pub use weather::HttpWeatherService;
pub use web_search::HttpWebSearchService;
