pub(crate) mod figure;
pub(crate) mod frame;
pub(crate) mod layout;
pub(crate) mod network;
pub(crate) mod task;
