pub mod assessment;
pub mod config;
pub mod status;
pub mod validation;

pub use assessment::{Assessment, assess_position};
pub use config::{ConfigError, RiskCfg};
pub use status::{Status, classify, comfort_threshold};
pub use validation::{ProposalAssessment, ProposalWarning, ValidationError, validate_proposal};
