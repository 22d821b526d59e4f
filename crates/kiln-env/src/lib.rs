//! # kiln-env
//!
//! Ephemeral environment store for Kiln.
//!
//! Environments are throwaway directories under `.kiln/envs/<label>`, each
//! with a `site/` directory for installed packages and a persisted
//! `env.json` descriptor. Creation always deletes any prior directory first,
//! and teardown removes the whole environment, so no state survives across
//! runs.

mod environment;
mod error;
mod record;
mod store;

pub use environment::{DESCRIPTOR_FILE, Environment, LINK_SUFFIX};
pub use error::EnvError;
pub use record::{RECORD_NAME, RecordEntry, parse_record};
pub use store::EnvStore;
