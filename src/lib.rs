#![deny(unused_must_use)]
#![warn(clippy::pedantic)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]

pub mod ast;
#[cfg(feature = "codegen")]
pub mod codegen;
pub mod config;
#[cfg(feature = "emission")]
pub mod emission;
pub mod input;
#[cfg(feature = "ollir")]
pub mod ollir;
#[cfg(feature = "optimizer")]
pub mod optimizer;
#[cfg(feature = "regalloc")]
pub mod regalloc;
pub mod report;
#[cfg(feature = "semantic_analysis")]
pub mod semantic_analysis;
pub mod table;
#[cfg(test)]
pub(crate) mod testutil;
