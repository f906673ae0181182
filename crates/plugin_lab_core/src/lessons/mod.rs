//! Small teaching units used to practice testing techniques: plain
//! functions, a calculator with error paths and a formatting helper, and a
//! processor trait with default methods.

pub mod basics;
pub mod calculator;
pub mod processor;
