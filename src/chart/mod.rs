pub(crate) mod bars;
pub(crate) mod clusters;
pub(crate) mod compose;
pub(crate) mod indicators;
pub(crate) mod labels;
pub(crate) mod model;
pub(crate) mod scale;
pub(crate) mod theme;
