pub mod cache_store;
pub mod rate_limiter;
pub mod record_sink;
pub mod text_source;
pub mod warn_writer;

pub use cache_store::{content_hash, CacheStore, JsonFileCache};
pub use rate_limiter::RateLimiter;
pub use record_sink::{JsonFileSink, RecordSink, SinkDocument};
pub use text_source::{FileTextSource, TextSource};
pub use warn_writer::WarnWriter;
