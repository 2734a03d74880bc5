// vision-ocr - Google Cloud Vision text detection client
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod source;
pub mod utils;
pub mod vision;
