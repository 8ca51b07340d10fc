pub(crate) mod chart;
pub(crate) mod timeline;
pub(crate) mod trends;
