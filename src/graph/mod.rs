//! Microsoft Graph access.
//!
//! The [`OneNoteApi`] trait describes the OneNote operations the server
//! exposes; [`OneNoteClient`] implements them over HTTP.

mod client;

pub use client::{page_html, GraphError, GraphResult, OneNoteApi, OneNoteClient, GRAPH_BASE_URL};
