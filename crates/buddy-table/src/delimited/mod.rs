//! Delimited text load and render.

mod header;
mod reader;
mod writer;
