mod explanation_manager;

pub(crate) use explanation_manager::ExplanationManager;
pub(crate) use explanation_manager::RunSummary;
