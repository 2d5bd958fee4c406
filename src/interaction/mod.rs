//! Ports for talking to the person at the terminal.
//!
//! Menus and URL opening are external collaborators. The core only depends on
//! these contracts; the CLI supplies the concrete prompt implementation.

mod opener;
mod selector;

pub use opener::{CommandUrlOpener, OpenError, UrlOpener};
pub use selector::{MenuOption, SelectError, Selector};
