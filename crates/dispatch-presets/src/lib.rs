//! Preset persistence for the ticket dispatch console.
//!
//! A preset is a named snapshot of the active query plus the history of who
//! saved it when. [`PresetStore`] holds the collection as an immutable value;
//! [`PresetRepository`] reads and writes it as a JSON file.
//!
//! Loading a preset ([`load`]) does not simply restore the snapshot: the
//! configured "maintained" properties keep their live values, so e.g. an
//! assignment filter keeps pointing at whoever is logged in now.

#![deny(unsafe_code)]

mod error;
mod repository;
mod store;

pub use error::{PresetError, Result};
pub use repository::PresetRepository;
pub use store::{PresetStore, load};
