pub mod machine;
pub mod steps;

pub use machine::{Advanced, Phase, RetreatPolicy, Wizard, WizardError};
pub use steps::Step;
