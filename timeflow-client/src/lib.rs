mod client;
mod timeflow_url;
mod token;

pub mod domain;

pub(crate) use timeflow_url::*;

pub use client::*;
pub use token::*;
