//! Client for the SAP Business One Service Layer, specialized to one job:
//! log in against a host that only negotiates legacy TLS, list supplier
//! business partners, and log out.
//!
//! The login handshake has two interchangeable strategies selected by
//! configuration: an in-process one (`direct`) that pins the TLS protocol
//! floor on a blocking [`reqwest`] client, and an external one (`curl`) that
//! delegates the handshake to the system curl binary and parses its raw
//! `-i` output for the `B1SESSION`/`ROUTEID` cookie pair. Both yield the
//! same [`Session`] handle.
//!
//! ```rust,no_run
//! use b1_suppliers::{acquire_session, fetch_suppliers, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mut session = acquire_session(&config)?;
//!     let suppliers = fetch_suppliers(&session, None)?;
//!     println!("{} suppliers", suppliers.len());
//!     session.release();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod login;
pub mod session;
pub mod suppliers;

pub use config::{Config, Strategy};
pub use error::{Error, Result};
pub use session::{acquire_session, release_session, Session};
pub use suppliers::{fetch_suppliers, SupplierRecord};
