pub mod config;
pub mod logging;

pub mod batch;
pub mod partition;
pub mod pool;
pub mod source;
pub mod storage;
pub mod url_list;
