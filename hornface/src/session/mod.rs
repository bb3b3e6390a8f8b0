pub(crate) mod overlay_session;
pub(crate) mod readiness;
pub(crate) mod replay;
