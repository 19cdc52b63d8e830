//! # Abduction solver
//! Finds every minimal explanation of an observation with respect to a knowledge base, using a
//! hybrid of minimal hitting-set enumeration (MHS) and the MergeXplain-style conflict search
//! (MXP).
//!
//! An explanation is a set of abducible assertions which, added to the knowledge base, is
//! consistent with it and makes it entail the observation. The search itself lives in
//! [`core`]; this crate connects it to knowledge bases written in the `.kb` format (see
//! [`format::reader::KnowledgeBaseReader`]), which are decided by the
//! [`oracle::ClausalOracle`].
//!
//! # Example
//! ```rust
//! # use abduction_solver::Instance;
//! # use abduction_solver::core::SolverOptions;
//! # use abduction_solver::core::termination::Indefinite;
//! let source = "
//! r A(?x) -> C(?x)
//! r B(?x) & D(?x) -> C(?x)
//! o C(a)
//! a A B D
//! ";
//!
//! let mut instance = Instance::read(source.as_bytes()).expect("valid knowledge base");
//! let options = SolverOptions {
//!     negation_allowed: false,
//!     ..SolverOptions::default()
//! };
//!
//! let report = instance
//!     .solve(options, &mut Indefinite, &mut (), &mut ())
//!     .expect("the oracle has no decision limit");
//!
//! let explanations = report
//!     .explanations
//!     .iter()
//!     .map(|explanation| explanation.to_string())
//!     .collect::<Vec<_>>();
//! assert_eq!(vec!["{A(a)}", "{B(a),D(a)}"], explanations);
//! ```
mod instance;

pub use abduction_clausal_oracle as oracle;
pub use abduction_core as core;
pub use abduction_format as format;
pub use instance::DocumentLoader;
pub use instance::Instance;
pub use instance::InstanceError;
