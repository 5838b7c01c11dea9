#![deny(warnings)]

pub mod config;
pub mod emotion;
pub mod engine;
pub mod markup;
pub mod output;
pub mod request;
pub mod tts;
pub mod util;
pub mod voice;
