//! Client-side accounting layer for the revenue splitter program
//!
//! - [`pda`] derives config, authority-info and vault addresses offline
//! - [`codec`] encodes instruction arguments and decodes account records,
//!   including the legacy u8-percentage vault layout
//! - [`orchestrator`] runs the multi-transaction vault creation workflow
//! - [`scanner`] lists and decodes every vault of an authority

pub mod codec;
pub mod config;
pub mod constants;
pub mod errors;
pub mod instructions;
pub mod orchestrator;
pub mod pda;
pub mod rpc;
pub mod scanner;
pub mod state;
pub mod validation;

pub use codec::{AccountRecord, CreateSplitterArgs};
pub use config::{ClientConfig, Cluster};
pub use errors::{BoxError, CodecError, Result, SplitterError, ValidationError};
pub use orchestrator::{VaultOrchestrator, VaultReceipt};
pub use pda::ProgramAddress;
pub use rpc::{AccountFilter, SplitterConnection, WalletSigner};
pub use scanner::{ScanReport, VaultScanner};
pub use state::{AuthorityInfo, Config, Recipient, RecipientInput, Vault, VaultFormat};
