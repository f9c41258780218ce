//! Detection of security and privacy anti-patterns in code text.

mod engine;
mod privacy;
mod secrets;
mod supabase;
mod types;

pub use engine::{builtin_detectors, DetectFn, Detector, Engine};
pub use privacy::detect_privacy_logs;
pub use secrets::detect_spooky_secrets;
pub use supabase::{
    detect_supabase_broad_insert, detect_supabase_service_role, has_service_role, uses_supabase,
};
pub use types::{AnalysisResult, Finding, RuleId, Severity};
