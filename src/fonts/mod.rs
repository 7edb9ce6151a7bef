pub(crate) mod backend;
pub(crate) mod config;
pub(crate) mod fetch;
pub(crate) mod layout;
pub(crate) mod provision;
