pub mod loop_fn;
pub mod train_config;
pub mod train_step;
pub mod trainer;

pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
pub use train_step::{TrainReport, TrainStep};
pub use trainer::{evaluate, train_network, Prediction};
