#![forbid(unsafe_code)]

//! @acp:module "Achieve Library"
//! @acp:summary "Achievement scoring engine for course-assessment reports"
//! @acp:domain scoring
//! @acp:layer api
//! @acp:stability stable
//!
//! # Achieve
//!
//! Derives goal weights, goal achievement and the overall achievement of
//! a course-assessment report from three editable matrices:
//!
//! - **Support ratings**: H/M/L strength of each indicator for each goal
//! - **Assessment methods**: score and per-goal weight of each instrument
//! - **Assessment results**: full and class-average score per instrument
//!
//! Every recompute pass reads the current cells, decides which stages
//! have enough data, derives from scratch and writes results back.
//!
//! ## Example
//!
//! ```rust
//! use achieve::{build_engine, Config, FieldId, FieldSpace, MemoryFields};
//!
//! let mut fields = MemoryFields::new()
//!     .with(FieldId::GoalCount, "2")
//!     .with(FieldId::SupportCell { row: 0, col: 0 }, "1.1")
//!     .with(FieldId::SupportCell { row: 0, col: 1 }, "H")
//!     .with(FieldId::SupportCell { row: 0, col: 2 }, "M");
//!
//! let engine = build_engine(Config::default(), None);
//! engine.recompute(&mut fields);
//!
//! assert_eq!(fields.get(&FieldId::GoalWeight { goal: 1 }), Some("0.600"));
//! assert_eq!(fields.get(&FieldId::OverallAchievement), Some("0.00"));
//! ```

pub mod config;
pub mod derive;
pub mod engine;
pub mod error;
pub mod fields;
pub mod gate;
pub mod notify;
pub mod reader;
pub mod schedule;
pub mod session;
pub mod validation;
pub mod writeback;

pub mod commands;

// Re-exports
pub use config::{Config, EngineKind, ResultsGatePolicy};
pub use derive::{GoalAchievements, GoalWeights};
pub use engine::{
    build_engine, CalculationEngine, DynamicEngine, PassReport, StageOutcome, StaticEngine,
};
pub use error::{AchieveError, Result};
pub use fields::{FieldId, FieldSpace, MemoryFields};
pub use gate::GateState;
pub use notify::{CollectingNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use reader::{Rating, Snapshot};
pub use schedule::Debouncer;
pub use session::Session;
pub use validation::{validate, ValidationIssue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
