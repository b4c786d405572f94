//! Page enhancer engine: fetching, HTML import and the host side of effect execution.
mod clock;
mod decode;
mod engine;
mod fetch;
mod import;
mod persist;
mod types;

pub use clock::ManualClock;
pub use decode::{decode_body, DecodedBody};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use import::{import_fragment, parse_document};
pub use persist::{ensure_output_dir, PersistError, SnapshotWriter};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
