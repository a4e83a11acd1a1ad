pub mod decimal_format;
pub mod time_utils;
pub mod timestamp_format;
