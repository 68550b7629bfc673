pub mod amount;
pub mod command;
pub mod config;
pub mod export;
pub mod flow;
pub mod model;
pub mod provider;
pub mod render;
pub mod screens;
pub mod transfer;
pub mod validation;
pub mod wizard;

pub use amount::Amount;
pub use config::Config;
pub use model::{Account, Beneficiary};
pub use transfer::{TransferMachine, TransferState, TransferStatus};
pub use wizard::{Action, Wizard};
