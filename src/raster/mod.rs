pub(crate) mod blur;
pub(crate) mod buffer;
pub(crate) mod color;
pub(crate) mod composite;
pub(crate) mod encode;
