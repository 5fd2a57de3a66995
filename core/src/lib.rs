//! # sift-core
//!
//! `sift-core` hosts the no-std collaborator traits the retrieval pipeline talks to. The pipeline
//! itself never speaks a vendor protocol: it only needs something that turns text into vectors
//! and something that turns a question plus retrieved context into an answer.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   sift-rag      │───▶│    sift-core     │◀───│   Providers     │
//! │                 │    │   (this crate)   │    │                 │
//! │ - chunking      │    │                  │    │ - hosted APIs   │
//! │ - flat index    │    │ - EmbeddingModel │    │ - local models  │
//! │ - retrieval     │    │ - AnswerGenerator│    │ - test mocks    │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! | Capability | Trait | Description |
//! |------------|-------|-------------|
//! | **Embeddings** | [`EmbeddingModel`] | Convert text to fixed-dimension vectors |
//! | **Answers** | [`AnswerGenerator`] | Answer a question from retrieved context |
//!
//! Both traits return the crate-wide [`Result`], an [`anyhow::Result`]. Failures are opaque to
//! the pipeline: transport, authentication and rate-limit errors are passed through untouched and
//! never retried.
//!
//! ## Modules
//!
//! - [`embedding`]: turn text into dense vectors.
//! - [`answer`]: grounded answer generation and the default prompt templates.

#![no_std]
extern crate alloc;

/// Grounded answer generation.
pub mod answer;
/// Text embeddings.
pub mod embedding;

use alloc::string::String;

#[doc(inline)]
pub use answer::{AnswerGenerator, GroundedPrompt};
#[doc(inline)]
pub use embedding::{Embedding, EmbeddingModel};

/// Result type used throughout the crate.
///
/// Type alias for [`anyhow::Result<T>`](anyhow::Result) with [`String`] as default success type.
pub type Result<T = String> = anyhow::Result<T>;

pub use anyhow::Error;
