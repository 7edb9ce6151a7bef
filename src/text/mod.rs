pub(crate) mod bitmap;
pub(crate) mod layer;
pub(crate) mod native;
pub(crate) mod op;
