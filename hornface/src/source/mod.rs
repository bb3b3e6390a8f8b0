pub(crate) mod detect;
pub(crate) mod video;
