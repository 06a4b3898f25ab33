//! charla — a conversational AI client with an embedded admin dashboard.
//!
//! The client side of a retrieval-backed chat service: it sends user
//! messages (with bounded rolling history) to a backend, recognizes chart
//! specifications embedded in assistant replies, and turns them into render
//! plans. The admin side fetches conversation logs from the backend behind
//! a password gate and aggregates them into analytics, shown either in the
//! terminal or in the embedded web dashboard.

pub mod chart;
pub mod chat;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod session;
pub mod web;
