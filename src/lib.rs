//! Client for the AlphaESS open API.
//!
//! ```no_run
//! # async fn run() -> Result<(), alphaess_rs::api::Error> {
//! use alphaess_rs::{EssClient, Throttle};
//!
//! let client = EssClient::new("app id", "app secret")?;
//! if client.authenticate().await {
//!     for unit in client.get_data(&Throttle::from_millis(500)).await {
//!         println!("{:?}: {:?}", unit.sys_sn, unit.last_power);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod model;
pub mod settings;

pub use api::{EssClient, Error, FailurePolicy, RetryPolicy, Throttle};
pub use model::{ChargeSettings, Credentials, DischargeSettings, EssUnit, TimeWindow};
pub use settings::{read_settings, read_settings_from, Settings};
