//! Domain core of the quotation desk.
//!
//! Nothing here performs IO: form drafts turn raw text into request bodies,
//! and the list controller decides what to fetch while the caller fetches it.

pub use error::EngineError;
pub use money::MoneyCents;

pub mod calculator;
pub mod form;
pub mod item;
pub mod listing;
pub mod numeric;
pub mod profile;
pub mod quotation;
pub mod status;

mod error;
mod money;

pub type ResultEngine<T> = Result<T, EngineError>;
