mod common;
mod service;
mod timeline;
