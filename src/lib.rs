//! A small terminal text editor built on a piece table, with KMP search,
//! snapshot undo history and bracket matching.

pub mod config;
pub mod controller;
pub mod document_model;
pub mod view;
