//! rehearse-core: Core library for the rehearse interview coach
//!
//! This crate provides the domain layer behind the HTTP server:
//!
//! - **Sessions** - [`SessionManager`] runs the question, answer and score loop
//! - **Interview** - question generation, answer scoring and closing feedback
//! - **Analytics** - [`Aggregator`] computes dashboard statistics
//! - **Store** - the [`DocumentStore`] trait with in-memory and JSON-file adapters
//! - **Auth** - ID token verification producing an [`Identity`]
//! - **Profiles** - one [`UserProfile`] per user
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rehearse_core::auth::Identity;
//! use rehearse_core::interview::ModelClient;
//! use rehearse_core::session::{SessionManager, StartRequest};
//! use rehearse_core::store::MemoryDocumentStore;
//! use rehearse_models::OllamaProvider;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ModelClient::new(Arc::new(OllamaProvider::new()), "llama3.2");
//!     let manager = SessionManager::new(Arc::new(MemoryDocumentStore::new()), client);
//!
//!     let started = manager
//!         .start(
//!             &Identity::new("alice"),
//!             StartRequest {
//!                 role: "Backend Engineer".into(),
//!                 experience: "3 years".into(),
//!                 num_questions: 5,
//!             },
//!         )
//!         .await?;
//!     println!("{}", started.first_question);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 SessionManager                   │
//! │  ┌───────────┐ ┌───────────┐ ┌───────────────┐  │
//! │  │ Question  │ │  Answer   │ │   Feedback    │  │
//! │  │ Generator │ │ Evaluator │ │    Writer     │  │
//! │  └───────────┘ └───────────┘ └───────────────┘  │
//! │          └───── ModelClient ─────┘              │
//! └─────────────────────────────────────────────────┘
//!                         │
//!                         ▼
//! ┌─────────────────────────────────────────────────┐
//! │   SessionRepository  ──►  dyn DocumentStore     │
//! │          ▲                                       │
//! │      Aggregator                                  │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod auth;
pub mod error;
pub mod interview;
pub mod profile;
pub mod session;
pub mod store;

// Re-export key types for convenience
pub use analytics::{Aggregator, Dashboard, SessionSummary};
pub use auth::{AuthConfig, AuthError, DevVerifier, Identity, IdentityVerifier, JwtValidator};
pub use error::{RehearseError, SessionError, UnauthorizedReason};
pub use interview::{AnswerEvaluator, FeedbackWriter, ModelClient, QuestionGenerator, Rubric};
pub use profile::{ProfileService, UserProfile};
pub use session::{
    AnswerOutcome, Confidence, FinalReport, InterviewSettings, Session, SessionManager,
    SessionStatus, StartRequest, StartedSession, Verdict,
};
pub use store::{DocumentStore, JsonFileDocumentStore, MemoryDocumentStore, StoreError};
