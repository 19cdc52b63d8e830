mod axiom;
mod axiom_set;
mod explanation;
mod observation;

pub use axiom::Axiom;
pub use axiom_set::AxiomSet;
pub use explanation::Explanation;
pub use observation::Observation;
