//! Pipeline stages for PDF translation.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ page ──▶ render
//!                                      │
//!                                chunk + remote
//! ```
//!
//! 1. [`input`]: validate the path (or download the URL) before any work
//! 2. [`extract`]: per-page text through pdfium, in `spawn_blocking`
//! 3. [`normalize`]: collapse whitespace runs, trim
//! 4. [`page`]: send a page whole or in [`chunk`]s, paced, through
//!    [`remote`] which owns the retry loop; the only stage with network I/O
//! 5. [`render`]: lay out ([`layout`]) and write the translated PDF
//!
//! [`engine`] binds the pdfium library for stages 2 and 5.

pub mod chunk;
pub mod engine;
pub mod extract;
pub mod input;
pub mod layout;
pub mod normalize;
pub mod page;
pub mod remote;
pub mod render;
