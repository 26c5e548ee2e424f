pub mod action;
pub mod cancel;
pub mod collaborators;
pub mod critique;
pub mod error;
pub mod goal;
pub mod message;
pub mod observation;
pub mod ordered_map;
pub mod result;
pub mod state;
pub mod tool_spec;
pub mod trace;
