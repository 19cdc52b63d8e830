use std::io::Read;
use std::rc::Rc;
use std::sync::Arc;

use abduction_clausal_oracle::ground_axiom;
use abduction_clausal_oracle::ClausalOracle;
use abduction_core::termination::TerminationCondition;
use abduction_core::Abducibles;
use abduction_core::AbductionError;
use abduction_core::AbductionReport;
use abduction_core::AxiomSet;
use abduction_core::ExplanationSink;
use abduction_core::HybridSolver;
use abduction_core::Loader;
use abduction_core::Observation;
use abduction_core::OracleError;
use abduction_core::ProgressSink;
use abduction_core::SolveError;
use abduction_core::SolverOptions;
use abduction_format::reader;
use abduction_format::reader::KnowledgeBaseReader;
use abduction_format::AbducibleDeclaration;
use abduction_format::KnowledgeBaseDocument;
use log::debug;

/// The errors which can occur while turning a knowledge-base file into an [`Instance`].
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("the knowledge base could not be read, more details: {0}")]
    Read(#[from] reader::Error),
    #[error("the knowledge base could not be grounded, more details: {0}")]
    Grounding(#[from] OracleError),
    #[error(transparent)]
    Abduction(#[from] AbductionError),
}

/// A [`Loader`] for the observation and abducibles of a [`KnowledgeBaseDocument`].
///
/// Abducible symbols are classes unless the knowledge base uses them with two arguments, in
/// which case they are roles. Without any declaration, every unary and binary symbol of the
/// knowledge base is abducible.
#[derive(Clone, Debug)]
pub struct DocumentLoader {
    abducibles: Abducibles,
    observation: Observation,
}

impl DocumentLoader {
    pub fn new(document: &KnowledgeBaseDocument) -> Result<DocumentLoader, InstanceError> {
        let observation = document
            .observation
            .iter()
            .map(ground_axiom)
            .collect::<Result<Vec<_>, _>>()?;
        let observation = Observation::new(observation)?;

        let abducibles = match &document.abducibles {
            AbducibleDeclaration::Literals(literals) => {
                let mut axioms = AxiomSet::new();
                for literal in literals {
                    axioms.add(ground_axiom(literal)?);
                }
                Abducibles::Axioms(axioms)
            }
            AbducibleDeclaration::Symbols(symbols) => {
                let arities = symbols
                    .iter()
                    .map(|symbol| (symbol, document.arity_of(symbol).unwrap_or(1)));
                symbol_abducibles(document, arities)
            }
            AbducibleDeclaration::AllSymbols => {
                let symbols = document.symbols();
                symbol_abducibles(document, symbols.iter().map(|(name, arity)| (name, *arity)))
            }
        };

        Ok(DocumentLoader {
            abducibles,
            observation,
        })
    }
}

fn symbol_abducibles<'a>(
    document: &KnowledgeBaseDocument,
    symbols: impl Iterator<Item = (&'a Rc<str>, usize)>,
) -> Abducibles {
    let mut classes = Vec::new();
    let mut roles = Vec::new();

    for (symbol, arity) in symbols {
        match arity {
            1 => classes.push(Arc::from(&**symbol)),
            2 => roles.push(Arc::from(&**symbol)),
            _ => debug!("Symbol {symbol} with arity {arity} cannot be abduced"),
        }
    }

    Abducibles::Symbols {
        classes,
        roles,
        individuals: document
            .individuals
            .iter()
            .map(|individual| Arc::from(&**individual))
            .collect(),
    }
}

impl Loader for DocumentLoader {
    fn abducibles(&self) -> &Abducibles {
        &self.abducibles
    }

    fn observation(&self) -> &Observation {
        &self.observation
    }
}

/// An abduction problem read from a knowledge-base file, decided by a [`ClausalOracle`].
#[derive(Debug)]
pub struct Instance {
    pub loader: DocumentLoader,
    pub oracle: ClausalOracle,
}

impl Instance {
    pub fn from_document(document: &KnowledgeBaseDocument) -> Result<Instance, InstanceError> {
        Ok(Instance {
            loader: DocumentLoader::new(document)?,
            oracle: ClausalOracle::from_document(document)?,
        })
    }

    /// Reads and grounds a knowledge base in the `.kb` format.
    pub fn read(source: impl Read) -> Result<Instance, InstanceError> {
        let document = KnowledgeBaseReader::new(source).read()?;
        Instance::from_document(&document)
    }

    /// Bounds the number of decisions of every consistency check of the oracle.
    pub fn with_decision_limit(self, decision_limit: Option<u64>) -> Instance {
        Instance {
            oracle: self.oracle.with_decision_limit(decision_limit),
            ..self
        }
    }

    /// Searches for the explanations of the observation; see [`HybridSolver::solve`].
    pub fn solve(
        &mut self,
        options: SolverOptions,
        termination: &mut impl TerminationCondition,
        progress: &mut impl ProgressSink,
        sink: &mut impl ExplanationSink,
    ) -> Result<AbductionReport, SolveError> {
        HybridSolver::new(options).solve(
            &mut self.oracle,
            &self.loader,
            termination,
            progress,
            sink,
        )
    }
}
