//! Goldfish simulation: a reference turn driver and parallel trial batches.
//!
//! `GoldfishDriver` plays one trial with a fixed greedy policy and reports
//! what happened; `TrialRunner` runs a batch of trials across worker
//! threads and aggregates the reports into a `TrialSummary`.
//!
//! ```ignore
//! let runner = TrialRunner::new(catalog, deck, SimConfig::new().with_trials(500))?;
//! let summary = runner.run()?;
//! println!("kill rate {:.2}", summary.kill_rate);
//! ```

mod driver;
mod trials;

pub use driver::{GoldfishDriver, TrialReport};
pub use trials::{TrialRunner, TrialSummary};
