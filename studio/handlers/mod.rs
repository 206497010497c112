pub mod network;
pub mod train;
pub mod train_sse;
